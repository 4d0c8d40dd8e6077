//! Type metadata consulted while building, writing and evaluating trees

use std::fmt;
use std::rc::Rc;

/// A type as far as the writer and the reductions need to know about it.
/// Primitive types are their own variants so they can be matched directly;
/// everything else is a shared [`Named`] description.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Void,
    Boolean,
    Char,
    String,
    Object,
    SByte,
    Byte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Single,
    Double,
    Decimal,
    Array(Rc<Type>, usize),
    Parameter(Rc<str>),
    Named(Rc<Named>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Form {
    Class,
    Struct,
    Interface,
}

/// A class, struct or interface. Generic types carry their arguments; an
/// open generic definition carries its parameters and has `definition` set.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Named {
    pub name: String,
    pub form: Form,
    pub arguments: Vec<Type>,
    pub definition: bool,
    pub base: Option<Type>,
    pub interfaces: Vec<Type>,
    pub enumerator: Option<Type>,
}

impl Named {
    pub fn new(name: &str, form: Form) -> Named {
        Named {
            name: name.to_string(),
            form,
            arguments: Vec::new(),
            definition: false,
            base: None,
            interfaces: Vec::new(),
            enumerator: None,
        }
    }

    pub fn with_arguments(mut self, arguments: Vec<Type>) -> Named {
        self.arguments = arguments;
        self
    }

    pub fn deriving(mut self, base: Type) -> Named {
        self.base = Some(base);
        self
    }

    pub fn implementing(mut self, interface: Type) -> Named {
        self.interfaces
            .push(interface);
        self
    }

    /// Declare a pattern-based `GetEnumerator()` returning the given type.
    pub fn enumerated_by(mut self, enumerator: Type) -> Named {
        self.enumerator = Some(enumerator);
        self
    }
}

impl From<Named> for Type {
    fn from(named: Named) -> Type {
        Type::Named(Rc::new(named))
    }
}

impl Type {
    pub fn class(name: &str) -> Type {
        Named::new(name, Form::Class).into()
    }

    pub fn structure(name: &str) -> Type {
        Named::new(name, Form::Struct).into()
    }

    pub fn interface(name: &str) -> Type {
        Named::new(name, Form::Interface).into()
    }

    /// An instantiated generic class such as `List<int>`.
    pub fn generic(name: &str, arguments: Vec<Type>) -> Type {
        Named::new(name, Form::Class)
            .with_arguments(arguments)
            .into()
    }

    /// An open generic definition such as `Dictionary<,>`.
    pub fn definition(name: &str, parameters: &[&str]) -> Type {
        let mut named = Named::new(name, Form::Class).with_arguments(
            parameters
                .iter()
                .map(|parameter| Type::Parameter(Rc::from(*parameter)))
                .collect(),
        );
        named.definition = true;
        named.into()
    }

    pub fn array(element: Type) -> Type {
        Type::Array(Rc::new(element), 1)
    }

    pub fn array_of_rank(element: Type, rank: usize) -> Type {
        Type::Array(Rc::new(element), rank.max(1))
    }

    pub fn parameter(name: &str) -> Type {
        Type::Parameter(Rc::from(name))
    }

    pub fn disposable() -> Type {
        Type::interface("IDisposable")
    }

    pub fn enumerable() -> Type {
        Type::interface("IEnumerable")
    }

    pub fn enumerable_of(element: Type) -> Type {
        Named::new("IEnumerable", Form::Interface)
            .with_arguments(vec![element])
            .implementing(Type::enumerable())
            .into()
    }

    pub fn enumerator() -> Type {
        Type::interface("IEnumerator")
    }

    pub fn enumerator_of(element: Type) -> Type {
        Named::new("IEnumerator", Form::Interface)
            .with_arguments(vec![element])
            .implementing(Type::enumerator())
            .implementing(Type::disposable())
            .into()
    }

    /// The runtime type object returned by `GetType()`.
    pub fn runtime() -> Type {
        Type::class("Type")
    }

    pub fn exception() -> Type {
        Type::class("Exception")
    }

    /// The delegate type of a lambda: `Func<…>` when it returns a value,
    /// `Action<…>` otherwise.
    pub fn delegate(parameters: &[Type], returns: &Type) -> Type {
        let mut arguments = parameters.to_vec();
        if *returns == Type::Void {
            if arguments.is_empty() {
                return Type::class("Action");
            }
            Type::generic("Action", arguments)
        } else {
            arguments.push(returns.clone());
            Type::generic("Func", arguments)
        }
    }

    /// The C# keyword for a primitive type.
    pub fn keyword(&self) -> Option<&'static str> {
        let keyword = match self {
            Type::Void => "void",
            Type::Boolean => "bool",
            Type::Char => "char",
            Type::String => "string",
            Type::Object => "object",
            Type::SByte => "sbyte",
            Type::Byte => "byte",
            Type::Int16 => "short",
            Type::UInt16 => "ushort",
            Type::Int32 => "int",
            Type::UInt32 => "uint",
            Type::Int64 => "long",
            Type::UInt64 => "ulong",
            Type::Single => "float",
            Type::Double => "double",
            Type::Decimal => "decimal",
            _ => return None,
        };
        Some(keyword)
    }

    pub fn named(&self) -> Option<&Named> {
        match self {
            Type::Named(named) => Some(named),
            _ => None,
        }
    }

    pub fn is_void(&self) -> bool {
        *self == Type::Void
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array(..))
    }

    pub fn element(&self) -> Option<&Type> {
        match self {
            Type::Array(element, _) => Some(element),
            _ => None,
        }
    }

    pub fn rank(&self) -> usize {
        match self {
            Type::Array(_, rank) => *rank,
            _ => 0,
        }
    }

    pub fn is_value_type(&self) -> bool {
        match self {
            Type::Void | Type::String | Type::Object | Type::Array(..) | Type::Parameter(_) => {
                false
            }
            Type::Named(named) => named.form == Form::Struct,
            _ => true,
        }
    }

    pub fn is_integral(&self) -> bool {
        matches!(
            self,
            Type::SByte
                | Type::Byte
                | Type::Int16
                | Type::UInt16
                | Type::Int32
                | Type::UInt32
                | Type::Int64
                | Type::UInt64
        )
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integral() || matches!(self, Type::Single | Type::Double | Type::Decimal)
    }

    /// Interfaces directly implemented by this type. Arrays pick up the
    /// collection interfaces the runtime gives them.
    pub fn interfaces(&self) -> Vec<Type> {
        match self {
            Type::Named(named) => named
                .interfaces
                .clone(),
            Type::Array(element, 1) => vec![Type::enumerable_of(element.as_ref().clone())],
            Type::Array(..) => vec![Type::enumerable()],
            _ => Vec::new(),
        }
    }

    fn base(&self) -> Option<Type> {
        match self {
            Type::Named(named) => named
                .base
                .clone(),
            _ => None,
        }
    }

    /// Whether this type is, derives from, or implements `other`.
    pub fn implements(&self, other: &Type) -> bool {
        if self == other {
            return true;
        }
        if let Some(base) = self.base() {
            if base.implements(other) {
                return true;
            }
        }
        self.interfaces()
            .iter()
            .any(|interface| interface.implements(other))
    }

    /// Whether a value of type `source` can be stored in a location of this
    /// type without an explicit conversion.
    pub fn is_assignable_from(&self, source: &Type) -> bool {
        if self == source {
            return true;
        }
        if source.is_void() {
            return false;
        }
        if *self == Type::Object {
            return true;
        }
        if source.is_value_type() {
            // boxing only reaches interfaces the struct implements
            return self.named().map_or(false, |named| named.form == Form::Interface)
                && source.implements(self);
        }
        source.implements(self)
    }

    pub fn is_disposable(&self) -> bool {
        self.implements(&Type::disposable())
    }

    /// The element type `T` if this type implements `IEnumerable<T>`.
    pub fn enumerable_element(&self) -> Option<Type> {
        find_generic_interface(self, "IEnumerable")
    }

    /// The element type `T` if this type implements `IEnumerator<T>`.
    pub fn enumerator_element(&self) -> Option<Type> {
        find_generic_interface(self, "IEnumerator")
    }

    pub fn supports_iteration(&self) -> bool {
        self.is_array()
            || self
                .named()
                .map_or(false, |named| named.enumerator.is_some())
            || self.implements(&Type::enumerable())
    }
}

fn find_generic_interface(start: &Type, name: &str) -> Option<Type> {
    if let Type::Named(named) = start {
        if named.form == Form::Interface && named.name == name && named.arguments.len() == 1 {
            return Some(named.arguments[0].clone());
        }
    }
    if let Some(base) = start.base() {
        if let Some(found) = find_generic_interface(&base, name) {
            return Some(found);
        }
    }
    start
        .interfaces()
        .iter()
        .find_map(|interface| find_generic_interface(interface, name))
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(keyword) = self.keyword() {
            return f.write_str(keyword);
        }
        match self {
            Type::Array(element, rank) => {
                write!(f, "{}[{}]", element, ",".repeat(rank.saturating_sub(1)))
            }
            Type::Parameter(name) => f.write_str(name),
            Type::Named(named) => {
                f.write_str(&named.name)?;
                if named.definition {
                    write!(f, "<{}>", ",".repeat(named.arguments.len().saturating_sub(1)))
                } else if !named
                    .arguments
                    .is_empty()
                {
                    f.write_str("<")?;
                    for (i, argument) in named
                        .arguments
                        .iter()
                        .enumerate()
                    {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{}", argument)?;
                    }
                    f.write_str(">")
                } else {
                    Ok(())
                }
            }
            _ => unreachable!(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Field,
    Property,
}

/// A field or property.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Member {
    pub name: String,
    pub declaring: Type,
    pub ty: Type,
    pub kind: MemberKind,
    pub is_static: bool,
}

impl Member {
    pub fn property(declaring: Type, name: &str, ty: Type) -> Member {
        Member {
            name: name.to_string(),
            declaring,
            ty,
            kind: MemberKind::Property,
            is_static: false,
        }
    }

    pub fn field(declaring: Type, name: &str, ty: Type) -> Member {
        Member {
            name: name.to_string(),
            declaring,
            ty,
            kind: MemberKind::Field,
            is_static: false,
        }
    }

    pub fn shared(mut self) -> Member {
        self.is_static = true;
        self
    }

    pub fn length(array: Type) -> Member {
        Member::property(array, "Length", Type::Int32)
    }

    pub fn current(enumerator: Type, element: Type) -> Member {
        Member::property(enumerator, "Current", element)
    }
}

/// A method. Generic methods list their type arguments; an open generic
/// method definition has `definition` set.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Method {
    pub name: String,
    pub declaring: Type,
    pub parameters: Vec<Type>,
    pub returns: Type,
    pub generic_arguments: Vec<Type>,
    pub definition: bool,
    pub is_static: bool,
}

impl Method {
    pub fn instance(declaring: Type, name: &str, parameters: Vec<Type>, returns: Type) -> Method {
        Method {
            name: name.to_string(),
            declaring,
            parameters,
            returns,
            generic_arguments: Vec::new(),
            definition: false,
            is_static: false,
        }
    }

    pub fn function(declaring: Type, name: &str, parameters: Vec<Type>, returns: Type) -> Method {
        Method {
            is_static: true,
            ..Method::instance(declaring, name, parameters, returns)
        }
    }

    pub fn with_generic_arguments(mut self, arguments: Vec<Type>) -> Method {
        self.generic_arguments = arguments;
        self
    }

    pub fn as_definition(mut self, parameters: &[&str]) -> Method {
        self.generic_arguments = parameters
            .iter()
            .map(|parameter| Type::parameter(parameter))
            .collect();
        self.definition = true;
        self
    }

    pub fn pow() -> Method {
        Method::function(
            Type::class("Math"),
            "Pow",
            vec![Type::Double, Type::Double],
            Type::Double,
        )
    }

    pub fn get_type() -> Method {
        Method::instance(Type::Object, "GetType", Vec::new(), Type::runtime())
    }

    pub fn dispose() -> Method {
        Method::instance(Type::disposable(), "Dispose", Vec::new(), Type::Void)
    }

    pub fn move_next(enumerator: Type) -> Method {
        Method::instance(enumerator, "MoveNext", Vec::new(), Type::Boolean)
    }

    pub fn get_enumerator(enumerable: Type, enumerator: Type) -> Method {
        Method::instance(enumerable, "GetEnumerator", Vec::new(), enumerator)
    }
}

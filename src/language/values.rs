//! Values held by constants and produced by evaluation

use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use crate::evaluation::EvaluationError;
use crate::language::{Member, Method, Type};

/// Host objects reachable from a tree. Method calls and member access on an
/// object are dispatched through this trait; returning
/// [`EvaluationError::Thrown`] raises an exception inside the evaluated
/// tree, where a `catch` can handle it.
pub trait Object {
    fn type_of(&self) -> Type;

    fn invoke(&self, method: &Method, _arguments: &[Value]) -> Result<Value, EvaluationError> {
        Err(EvaluationError::MissingMember {
            ty: self.type_of(),
            name: method
                .name
                .clone(),
        })
    }

    fn get(&self, member: &Member) -> Result<Value, EvaluationError> {
        Err(EvaluationError::MissingMember {
            ty: self.type_of(),
            name: member
                .name
                .clone(),
        })
    }

    fn set(&self, member: &Member, _value: Value) -> Result<(), EvaluationError> {
        Err(EvaluationError::MissingMember {
            ty: self.type_of(),
            name: member
                .name
                .clone(),
        })
    }
}

#[derive(Clone)]
pub enum Value {
    Void,
    Null,
    Boolean(bool),
    Char(char),
    String(Rc<str>),
    SByte(i8),
    Byte(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Single(f32),
    Double(f64),
    Array(Rc<RefCell<Vec<Value>>>, Type),
    Object(Rc<dyn Object>),
    Type(Type),
}

impl Value {
    pub fn string(text: &str) -> Value {
        Value::String(Rc::from(text))
    }

    pub fn array(element: Type, values: Vec<Value>) -> Value {
        Value::Array(Rc::new(RefCell::new(values)), element)
    }

    /// The runtime type of this value. `null` has no type of its own and
    /// reports `object`.
    pub fn type_of(&self) -> Type {
        match self {
            Value::Void => Type::Void,
            Value::Null => Type::Object,
            Value::Boolean(_) => Type::Boolean,
            Value::Char(_) => Type::Char,
            Value::String(_) => Type::String,
            Value::SByte(_) => Type::SByte,
            Value::Byte(_) => Type::Byte,
            Value::Int16(_) => Type::Int16,
            Value::UInt16(_) => Type::UInt16,
            Value::Int32(_) => Type::Int32,
            Value::UInt32(_) => Type::UInt32,
            Value::Int64(_) => Type::Int64,
            Value::UInt64(_) => Type::UInt64,
            Value::Single(_) => Type::Single,
            Value::Double(_) => Type::Double,
            Value::Array(_, element) => Type::array(element.clone()),
            Value::Object(object) => object.type_of(),
            Value::Type(_) => Type::runtime(),
        }
    }

    /// The value a variable of the given type holds before assignment.
    pub fn default_of(ty: &Type) -> Value {
        match ty {
            Type::Void => Value::Void,
            Type::Boolean => Value::Boolean(false),
            Type::Char => Value::Char('\0'),
            Type::SByte => Value::SByte(0),
            Type::Byte => Value::Byte(0),
            Type::Int16 => Value::Int16(0),
            Type::UInt16 => Value::UInt16(0),
            Type::Int32 => Value::Int32(0),
            Type::UInt32 => Value::UInt32(0),
            Type::Int64 => Value::Int64(0),
            Type::UInt64 => Value::UInt64(0),
            Type::Single => Value::Single(0.0),
            Type::Double => Value::Double(0.0),
            _ => Value::Null,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Integral values widened to a common representation.
    pub fn as_integer(&self) -> Option<i128> {
        let i = match self {
            Value::Char(c) => *c as i128,
            Value::SByte(i) => *i as i128,
            Value::Byte(i) => *i as i128,
            Value::Int16(i) => *i as i128,
            Value::UInt16(i) => *i as i128,
            Value::Int32(i) => *i as i128,
            Value::UInt32(i) => *i as i128,
            Value::Int64(i) => *i as i128,
            Value::UInt64(i) => *i as i128,
            _ => return None,
        };
        Some(i)
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Single(f) => Some(*f as f64),
            Value::Double(f) => Some(*f),
            _ => self
                .as_integer()
                .map(|i| i as f64),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Void, Value::Void) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a, _), Value::Array(b, _)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Type(a), Value::Type(b)) => a == b,
            (Value::Single(_) | Value::Double(_), _) | (_, Value::Single(_) | Value::Double(_)) => {
                self.type_of() == other.type_of() && self.as_float() == other.as_float()
            }
            _ => {
                self.type_of() == other.type_of()
                    && self.as_integer()
                        .is_some()
                    && self.as_integer() == other.as_integer()
            }
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Value) -> Option<Ordering> {
        if self.type_of() != other.type_of() {
            return None;
        }
        match (self, other) {
            (Value::String(a), Value::String(b)) => a.partial_cmp(b),
            (Value::Single(_) | Value::Double(_), _) => self
                .as_float()?
                .partial_cmp(&other.as_float()?),
            _ => self
                .as_integer()?
                .partial_cmp(&other.as_integer()?),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => f.write_str("Void"),
            Value::Null => f.write_str("Null"),
            Value::Boolean(b) => write!(f, "Boolean({})", b),
            Value::Char(c) => write!(f, "Char({:?})", c),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::SByte(i) => write!(f, "SByte({})", i),
            Value::Byte(i) => write!(f, "Byte({})", i),
            Value::Int16(i) => write!(f, "Int16({})", i),
            Value::UInt16(i) => write!(f, "UInt16({})", i),
            Value::Int32(i) => write!(f, "Int32({})", i),
            Value::UInt32(i) => write!(f, "UInt32({})", i),
            Value::Int64(i) => write!(f, "Int64({})", i),
            Value::UInt64(i) => write!(f, "UInt64({})", i),
            Value::Single(x) => write!(f, "Single({})", x),
            Value::Double(x) => write!(f, "Double({})", x),
            Value::Array(values, element) => {
                write!(f, "Array<{}>{:?}", element, values.borrow())
            }
            Value::Object(object) => write!(f, "Object({})", object.type_of()),
            Value::Type(ty) => write!(f, "Type({})", ty),
        }
    }
}

macro_rules! from_primitive {
    ($($rust:ty => $variant:ident),*) => {
        $(
            impl From<$rust> for Value {
                fn from(value: $rust) -> Value {
                    Value::$variant(value)
                }
            }
        )*
    };
}

from_primitive! {
    bool => Boolean,
    char => Char,
    i8 => SByte,
    u8 => Byte,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f32 => Single,
    f64 => Double
}

impl From<&str> for Value {
    fn from(value: &str) -> Value {
        Value::string(value)
    }
}

//! Operator and conversion semantics over runtime values

use crate::evaluation::EvaluationError;
use crate::language::{BinaryOperator, Type, UnaryOperator, Value};

fn mismatch(operator: BinaryOperator, left: &Value, right: &Value) -> EvaluationError {
    EvaluationError::Mismatch {
        operator,
        left: left.type_of(),
        right: right.type_of(),
    }
}

fn bad_operand(operator: UnaryOperator, operand: &Value) -> EvaluationError {
    EvaluationError::Operand {
        operator,
        operand: operand.type_of(),
    }
}

macro_rules! integral {
    ($operator:expr, $checked:expr, $left:expr, $right:expr; $($variant:ident),*) => {
        match ($left, $right) {
            $(
                (Value::$variant(a), Value::$variant(b)) => {
                    let (a, b) = (*a, *b);
                    let result = match $operator {
                        BinaryOperator::Add if $checked => a
                            .checked_add(b)
                            .ok_or(EvaluationError::Overflow)?,
                        BinaryOperator::Add => a.wrapping_add(b),
                        BinaryOperator::Subtract if $checked => a
                            .checked_sub(b)
                            .ok_or(EvaluationError::Overflow)?,
                        BinaryOperator::Subtract => a.wrapping_sub(b),
                        BinaryOperator::Multiply if $checked => a
                            .checked_mul(b)
                            .ok_or(EvaluationError::Overflow)?,
                        BinaryOperator::Multiply => a.wrapping_mul(b),
                        BinaryOperator::Divide | BinaryOperator::Modulo if b == 0 => {
                            return Err(EvaluationError::DivideByZero)
                        }
                        BinaryOperator::Divide => a
                            .checked_div(b)
                            .ok_or(EvaluationError::Overflow)?,
                        BinaryOperator::Modulo => a.wrapping_rem(b),
                        BinaryOperator::And => a & b,
                        BinaryOperator::Or => a | b,
                        BinaryOperator::ExclusiveOr => a ^ b,
                        BinaryOperator::LeftShift => a.wrapping_shl(b as u32),
                        BinaryOperator::RightShift => a.wrapping_shr(b as u32),
                        _ => return Err(mismatch($operator, $left, $right)),
                    };
                    Some(Value::$variant(result))
                }
            )*
            _ => None,
        }
    };
}

macro_rules! floating {
    ($operator:expr, $left:expr, $right:expr; $($variant:ident),*) => {
        match ($left, $right) {
            $(
                (Value::$variant(a), Value::$variant(b)) => {
                    let result = match $operator {
                        BinaryOperator::Add => a + b,
                        BinaryOperator::Subtract => a - b,
                        BinaryOperator::Multiply => a * b,
                        BinaryOperator::Divide => a / b,
                        BinaryOperator::Modulo => a % b,
                        _ => return Err(mismatch($operator, $left, $right)),
                    };
                    Some(Value::$variant(result))
                }
            )*
            _ => None,
        }
    };
}

/// Apply a binary operator to two evaluated operands. The short-circuiting
/// operators, `??`, assignment and array indexing never get here.
pub(crate) fn binary(
    operator: BinaryOperator,
    left: &Value,
    right: &Value,
    checked: bool,
) -> Result<Value, EvaluationError> {
    if operator.is_comparison() {
        return compare(operator, left, right);
    }

    if operator == BinaryOperator::Power {
        return match (left.as_float(), right.as_float()) {
            (Some(a), Some(b)) => Ok(Value::Double(a.powf(b))),
            _ => Err(mismatch(operator, left, right)),
        };
    }

    if operator == BinaryOperator::Add
        && (matches!(left, Value::String(_)) || matches!(right, Value::String(_)))
    {
        let joined = format!("{}{}", text(left), text(right));
        return Ok(Value::string(&joined));
    }

    if let (Value::Boolean(a), Value::Boolean(b)) = (left, right) {
        let result = match operator {
            BinaryOperator::And => a & b,
            BinaryOperator::Or => a | b,
            BinaryOperator::ExclusiveOr => a ^ b,
            _ => return Err(mismatch(operator, left, right)),
        };
        return Ok(Value::Boolean(result));
    }

    // shift counts take the type of the value being shifted
    let shift = matches!(
        operator,
        BinaryOperator::LeftShift | BinaryOperator::RightShift
    );
    let right = if shift
        && left
            .type_of()
            .is_integral()
    {
        convert(right, &left.type_of(), false)?
    } else {
        right.clone()
    };
    let right = &right;

    if let Some(result) = integral!(
        operator, checked, left, right;
        SByte, Byte, Int16, UInt16, Int32, UInt32, Int64, UInt64
    ) {
        return Ok(result);
    }

    if let Some(result) = floating!(operator, left, right; Single, Double) {
        return Ok(result);
    }

    Err(mismatch(operator, left, right))
}

fn compare(operator: BinaryOperator, left: &Value, right: &Value) -> Result<Value, EvaluationError> {
    let result = match operator {
        BinaryOperator::Equal => left == right,
        BinaryOperator::NotEqual => left != right,
        _ => {
            let ordering = left
                .partial_cmp(right)
                .ok_or_else(|| mismatch(operator, left, right))?;
            match operator {
                BinaryOperator::LessThan => ordering.is_lt(),
                BinaryOperator::LessThanOrEqual => ordering.is_le(),
                BinaryOperator::GreaterThan => ordering.is_gt(),
                _ => ordering.is_ge(),
            }
        }
    };
    Ok(Value::Boolean(result))
}

/// How a value reads when concatenated onto a string.
fn text(value: &Value) -> String {
    match value {
        Value::Void | Value::Null => String::new(),
        Value::Boolean(true) => "True".to_string(),
        Value::Boolean(false) => "False".to_string(),
        Value::Char(c) => c.to_string(),
        Value::String(s) => s.to_string(),
        Value::Single(x) => x.to_string(),
        Value::Double(x) => x.to_string(),
        Value::Type(ty) => ty.to_string(),
        Value::Array(..) | Value::Object(_) => value
            .type_of()
            .to_string(),
        _ => value
            .as_integer()
            .map(|i| i.to_string())
            .unwrap_or_default(),
    }
}

macro_rules! integral_unary {
    ($operator:expr, $operand:expr; $($variant:ident),*) => {
        match $operand {
            $(
                Value::$variant(a) => {
                    let a = *a;
                    let result = match $operator {
                        UnaryOperator::Negate => a.wrapping_neg(),
                        UnaryOperator::NegateChecked => a
                            .checked_neg()
                            .ok_or(EvaluationError::Overflow)?,
                        UnaryOperator::UnaryPlus => a,
                        UnaryOperator::Not | UnaryOperator::OnesComplement => !a,
                        UnaryOperator::Increment
                        | UnaryOperator::PreIncrementAssign
                        | UnaryOperator::PostIncrementAssign => a.wrapping_add(1),
                        UnaryOperator::Decrement
                        | UnaryOperator::PreDecrementAssign
                        | UnaryOperator::PostDecrementAssign => a.wrapping_sub(1),
                        _ => return Err(bad_operand($operator, $operand)),
                    };
                    Some(Value::$variant(result))
                }
            )*
            _ => None,
        }
    };
}

macro_rules! floating_unary {
    ($operator:expr, $operand:expr; $($variant:ident),*) => {
        match $operand {
            $(
                Value::$variant(a) => {
                    let a = *a;
                    let result = match $operator {
                        UnaryOperator::Negate | UnaryOperator::NegateChecked => -a,
                        UnaryOperator::UnaryPlus => a,
                        UnaryOperator::Increment
                        | UnaryOperator::PreIncrementAssign
                        | UnaryOperator::PostIncrementAssign => a + 1.0,
                        UnaryOperator::Decrement
                        | UnaryOperator::PreDecrementAssign
                        | UnaryOperator::PostDecrementAssign => a - 1.0,
                        _ => return Err(bad_operand($operator, $operand)),
                    };
                    Some(Value::$variant(result))
                }
            )*
            _ => None,
        }
    };
}

/// Apply an arithmetic or logical unary operator. The assigning forms
/// compute the new value only; storing it is up to the caller.
pub(crate) fn unary(operator: UnaryOperator, operand: &Value) -> Result<Value, EvaluationError> {
    if let Value::Boolean(b) = operand {
        return match operator {
            UnaryOperator::Not | UnaryOperator::IsFalse => Ok(Value::Boolean(!b)),
            UnaryOperator::IsTrue => Ok(Value::Boolean(*b)),
            _ => Err(bad_operand(operator, operand)),
        };
    }

    if let Some(result) = integral_unary!(
        operator, operand;
        SByte, Byte, Int16, UInt16, Int32, UInt32, Int64, UInt64
    ) {
        return Ok(result);
    }

    if let Some(result) = floating_unary!(operator, operand; Single, Double) {
        return Ok(result);
    }

    Err(bad_operand(operator, operand))
}

/// Convert a value to another type. Numeric conversions narrow, raising
/// overflow when `checked`; reference conversions succeed only when the
/// runtime type of the value fits.
pub(crate) fn convert(value: &Value, to: &Type, checked: bool) -> Result<Value, EvaluationError> {
    let from = value.type_of();
    if from == *to {
        return Ok(value.clone());
    }

    if value.is_null() {
        return if to.is_value_type() {
            Err(EvaluationError::NullReference)
        } else {
            Ok(Value::Null)
        };
    }

    if to.is_numeric() || *to == Type::Char {
        if let Some(converted) = numeric(value, to, checked)? {
            return Ok(converted);
        }
    }

    if !to.is_value_type() && to.is_assignable_from(&from) {
        return Ok(value.clone());
    }

    Err(EvaluationError::InvalidCast {
        from,
        to: to.clone(),
    })
}

fn numeric(value: &Value, to: &Type, checked: bool) -> Result<Option<Value>, EvaluationError> {
    if let Some(i) = value.as_integer() {
        return integer(i, value, to, checked);
    }

    if let Some(f) = value.as_float() {
        return match to {
            Type::Single => Ok(Some(Value::Single(f as f32))),
            Type::Double => Ok(Some(Value::Double(f))),
            _ => {
                if checked && !f.is_finite() {
                    return Err(EvaluationError::Overflow);
                }
                integer(f.trunc() as i128, value, to, checked)
            }
        };
    }

    Ok(None)
}

fn integer(
    i: i128,
    value: &Value,
    to: &Type,
    checked: bool,
) -> Result<Option<Value>, EvaluationError> {
    macro_rules! narrow {
        ($rust:ty, $variant:ident) => {
            if checked {
                Value::$variant(<$rust>::try_from(i).map_err(|_| EvaluationError::Overflow)?)
            } else {
                Value::$variant(i as $rust)
            }
        };
    }

    let converted = match to {
        Type::SByte => narrow!(i8, SByte),
        Type::Byte => narrow!(u8, Byte),
        Type::Int16 => narrow!(i16, Int16),
        Type::UInt16 => narrow!(u16, UInt16),
        Type::Int32 => narrow!(i32, Int32),
        Type::UInt32 => narrow!(u32, UInt32),
        Type::Int64 => narrow!(i64, Int64),
        Type::UInt64 => narrow!(u64, UInt64),
        Type::Single => Value::Single(i as f32),
        Type::Double => Value::Double(i as f64),
        Type::Char => {
            let code = if checked {
                u16::try_from(i).map_err(|_| EvaluationError::Overflow)?
            } else {
                i as u16
            };
            match char::from_u32(u32::from(code)) {
                Some(c) => Value::Char(c),
                None => {
                    return Err(EvaluationError::InvalidCast {
                        from: value.type_of(),
                        to: Type::Char,
                    })
                }
            }
        }
        _ => return Ok(None),
    };
    Ok(Some(converted))
}

#[cfg(test)]
mod check {
    use super::*;

    #[test]
    fn unchecked_arithmetic_wraps() {
        let result = binary(
            BinaryOperator::Add,
            &Value::Int32(i32::MAX),
            &Value::Int32(1),
            false,
        )
        .unwrap();
        assert_eq!(result, Value::Int32(i32::MIN));
    }

    #[test]
    fn checked_arithmetic_overflows() {
        let result = binary(
            BinaryOperator::Multiply,
            &Value::Int16(i16::MAX),
            &Value::Int16(2),
            true,
        );
        assert!(matches!(result, Err(EvaluationError::Overflow)));

        let result = unary(UnaryOperator::NegateChecked, &Value::Int32(i32::MIN));
        assert!(matches!(result, Err(EvaluationError::Overflow)));
    }

    #[test]
    fn division_by_zero() {
        let result = binary(
            BinaryOperator::Divide,
            &Value::Int32(1),
            &Value::Int32(0),
            false,
        );
        assert!(matches!(result, Err(EvaluationError::DivideByZero)));

        let result = binary(
            BinaryOperator::Divide,
            &Value::Double(1.0),
            &Value::Double(0.0),
            false,
        )
        .unwrap();
        assert_eq!(result, Value::Double(f64::INFINITY));
    }

    #[test]
    fn mixed_operands_are_rejected() {
        let result = binary(
            BinaryOperator::Add,
            &Value::Int32(1),
            &Value::Boolean(true),
            false,
        );
        assert!(matches!(result, Err(EvaluationError::Mismatch { .. })));
    }

    #[test]
    fn strings_concatenate() {
        let result = binary(
            BinaryOperator::Add,
            &Value::string("n = "),
            &Value::Int32(42),
            false,
        )
        .unwrap();
        assert_eq!(result, Value::string("n = 42"));
    }

    #[test]
    fn shifts_take_any_integral_count() {
        let result = binary(
            BinaryOperator::LeftShift,
            &Value::Int64(1),
            &Value::Int32(40),
            false,
        )
        .unwrap();
        assert_eq!(result, Value::Int64(1 << 40));
    }

    #[test]
    fn comparisons() {
        let less = binary(
            BinaryOperator::LessThan,
            &Value::Int32(1),
            &Value::Int32(2),
            false,
        )
        .unwrap();
        assert_eq!(less, Value::Boolean(true));

        let equal = binary(
            BinaryOperator::Equal,
            &Value::string("a"),
            &Value::string("a"),
            false,
        )
        .unwrap();
        assert_eq!(equal, Value::Boolean(true));

        let unordered = binary(
            BinaryOperator::GreaterThan,
            &Value::Int32(1),
            &Value::string("a"),
            false,
        );
        assert!(unordered.is_err());
    }

    #[test]
    fn narrowing_conversions() {
        let value = Value::Int32(70000);

        assert_eq!(
            convert(&value, &Type::Int16, false).unwrap(),
            Value::Int16(70000i32 as i16)
        );
        assert!(matches!(
            convert(&value, &Type::Int16, true),
            Err(EvaluationError::Overflow)
        ));
        assert_eq!(
            convert(&Value::Double(2.9), &Type::Int32, true).unwrap(),
            Value::Int32(2)
        );
        assert_eq!(
            convert(&Value::Int32(65), &Type::Char, false).unwrap(),
            Value::Char('A')
        );
    }

    #[test]
    fn reference_conversions() {
        assert_eq!(
            convert(&Value::string("s"), &Type::Object, false).unwrap(),
            Value::string("s")
        );
        assert!(matches!(
            convert(&Value::string("s"), &Type::Int32, false),
            Err(EvaluationError::InvalidCast { .. })
        ));
        assert_eq!(
            convert(&Value::Null, &Type::String, false).unwrap(),
            Value::Null
        );
        assert!(matches!(
            convert(&Value::Null, &Type::Int32, false),
            Err(EvaluationError::NullReference)
        ));
    }
}

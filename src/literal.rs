use crate::ast::{Expr, Literal, Type};
use crate::descriptor::field_descriptor;
use crate::error::Result;
use crate::model::Constant;

/// Source literal for a constant-pool or annotation constant.
pub fn decompile_literal(value: &Constant) -> Result<Expr> {
    Ok(match value {
        Constant::Boolean(b) => Expr::Literal(Literal::Boolean(*b)),
        Constant::Char(c) => Expr::Literal(Literal::Char(*c)),
        Constant::Byte(b) => Expr::Literal(Literal::Integer(i32::from(*b))),
        Constant::Short(s) => Expr::Literal(Literal::Integer(i32::from(*s))),
        Constant::Int(i) => Expr::Literal(Literal::Integer(*i)),
        Constant::Long(l) => Expr::Literal(Literal::Long(*l)),
        Constant::Float(f) => floating(f64::from(*f), "Float")
            .unwrap_or_else(|| Expr::Literal(Literal::Double(format!("{f:?}F")))),
        Constant::Double(d) => {
            floating(*d, "Double").unwrap_or_else(|| Expr::Literal(Literal::Double(format!("{d:?}D"))))
        }
        Constant::String(s) => Expr::Literal(Literal::String(s.clone())),
        Constant::Class(descriptor) if descriptor == "V" => Expr::Class(Type::Void),
        Constant::Class(descriptor) => Expr::Class(field_descriptor(descriptor)?),
    })
}

/// NaN and the infinities have no literal form.
fn floating(value: f64, boxed: &str) -> Option<Expr> {
    let constant = if value.is_nan() {
        "NaN"
    } else if value == f64::INFINITY {
        "POSITIVE_INFINITY"
    } else if value == f64::NEG_INFINITY {
        "NEGATIVE_INFINITY"
    } else {
        return None;
    };
    Some(Expr::FieldAccess {
        scope: Box::new(Expr::Name(boxed.to_string())),
        name: constant.to_string(),
    })
}

use std::fmt;

/// Runtime value on the operand stack and in registers.
///
/// Integer arithmetic is exact; `Real` enters a program only through `SQRT`
/// (and propagates through arithmetic from there); `Str` is produced only by
/// `STR` and consumed only by `PRN`.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Integer (64-bit signed).
    Int(i64),
    /// Real number (64-bit float).
    Real(f64),
    /// String value.
    Str(String),
}

impl Value {
    /// Create an integer value.
    pub fn int(v: i64) -> Self {
        Value::Int(v)
    }

    /// Create a real value.
    pub fn real(v: f64) -> Self {
        Value::Real(v)
    }

    /// Create a string value.
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    /// Try to get as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Real(v) => Some(*v as i64),
            Value::Str(_) => None,
        }
    }

    /// Try to get as a real number.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Real(v) => Some(*v),
            Value::Str(_) => None,
        }
    }

    /// Short type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Real(_) => "real",
            Value::Str(_) => "string",
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl fmt::Display for Value {
    /// Text form used by `PRN`: integers print plainly, reals always carry
    /// a decimal point (`12.0`, not `12`), strings print verbatim.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Real(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{:.1}", v),
            Value::Real(v) => write!(f, "{}", v),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

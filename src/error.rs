use std::fmt;

#[derive(Debug)]
pub enum ParBreakError {
    InvalidConfiguration(String),
    Infeasible { tolerance: f64 },
    Io(std::io::Error),
}

impl fmt::Display for ParBreakError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParBreakError::InvalidConfiguration(message) => {
                write!(f, "invalid configuration: {}", message)
            }
            ParBreakError::Infeasible { tolerance } => {
                write!(
                    f,
                    "no admissible break chain at tolerance {}; raise the tolerance",
                    tolerance
                )
            }
            ParBreakError::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl std::error::Error for ParBreakError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParBreakError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ParBreakError {
    fn from(value: std::io::Error) -> Self {
        ParBreakError::Io(value)
    }
}

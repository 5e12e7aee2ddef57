// crates/huaweicm-rs/src/error.rs

use quick_xml::Error as XmlError;
use quick_xml::events::attributes::AttrError;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors that can occur while converting CM XML dumps to CSV tables.
#[derive(Debug)]
pub enum CmError {
    /// The current input file is not well-formed XML. File-scoped: a
    /// directory run logs it and continues with the next file.
    Xml(XmlError),

    /// An I/O failure reading input or writing a CSV table.
    Io(io::Error),

    /// The input path is neither a readable file nor a readable directory.
    /// Fatal, detected before any processing starts.
    InputUnreadable(PathBuf),

    /// The output path is not a directory. Fatal, detected before any
    /// processing starts.
    OutputUnwritable(PathBuf),

    /// A line in the parameter selection file is not of the form
    /// `TYPE:param1,param2,...`.
    InvalidParameterConfig { line: usize },
}

impl From<XmlError> for CmError {
    fn from(e: XmlError) -> Self {
        CmError::Xml(e)
    }
}

impl From<AttrError> for CmError {
    fn from(e: AttrError) -> Self {
        CmError::Xml(XmlError::from(e))
    }
}

impl From<io::Error> for CmError {
    fn from(e: io::Error) -> Self {
        CmError::Io(e)
    }
}

impl fmt::Display for CmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CmError::Xml(e) => write!(f, "malformed XML document: {}", e),
            CmError::Io(e) => write!(f, "I/O error: {}", e),
            CmError::InputUnreadable(p) => {
                write!(f, "input file/directory can not be accessed: {}", p.display())
            }
            CmError::OutputUnwritable(p) => {
                write!(f, "output directory is not a directory: {}", p.display())
            }
            CmError::InvalidParameterConfig { line } => {
                write!(f, "parameter configuration line {} is not TYPE:param1,param2,...", line)
            }
        }
    }
}

impl std::error::Error for CmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CmError::Xml(e) => Some(e),
            CmError::Io(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CmError;
    use std::path::PathBuf;

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let cm_err: CmError = io_err.into();
        assert!(matches!(cm_err, CmError::Io(_)));
    }

    #[test]
    fn test_display_paths() {
        let err = CmError::InputUnreadable(PathBuf::from("/no/such/input"));
        assert!(err.to_string().contains("/no/such/input"));

        let err = CmError::OutputUnwritable(PathBuf::from("/no/such/out"));
        assert!(err.to_string().contains("/no/such/out"));
    }

    #[test]
    fn test_parameter_config_line_number() {
        let err = CmError::InvalidParameterConfig { line: 3 };
        assert!(err.to_string().contains("line 3"));
    }
}

use std::error::Error;
use std::fmt;

/// Recoverable device resource failures.
///
/// Driver-dependent conditions a caller can reasonably react to (fall back
/// to a smaller resource, skip an effect). Contract violations are not
/// errors and panic instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// The driver refused to allocate a GPU object.
    OutOfDeviceMemory,
    /// Window context registration failed; the message is driver-specific.
    ContextCreation(String),
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfDeviceMemory => write!(f, "out of device memory"),
            Self::ContextCreation(msg) => write!(f, "context creation failed: {msg}"),
        }
    }
}

impl Error for DeviceError {}

/// Technique creation failures, each carrying the driver's info log.
///
/// Shader sources are often authored assets, so compile errors are data
/// errors, not programming errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TechniqueError {
    InvalidVertexShader(String),
    InvalidGeometryShader(String),
    InvalidFragmentShader(String),
    LinkFailed(String),
}

impl TechniqueError {
    /// The driver info log attached to this failure.
    pub fn driver_log(&self) -> &str {
        match self {
            Self::InvalidVertexShader(log)
            | Self::InvalidGeometryShader(log)
            | Self::InvalidFragmentShader(log)
            | Self::LinkFailed(log) => log,
        }
    }
}

impl fmt::Display for TechniqueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidVertexShader(log) => {
                write!(f, "vertex shader compilation failed: {log}")
            }
            Self::InvalidGeometryShader(log) => {
                write!(f, "geometry shader compilation failed: {log}")
            }
            Self::InvalidFragmentShader(log) => {
                write!(f, "fragment shader compilation failed: {log}")
            }
            Self::LinkFailed(log) => write!(f, "program link failed: {log}"),
        }
    }
}

impl Error for TechniqueError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn technique_error_carries_driver_log() {
        let err = TechniqueError::InvalidFragmentShader("0:12: undeclared identifier".into());
        assert_eq!(err.driver_log(), "0:12: undeclared identifier");
        assert!(err.to_string().contains("fragment shader"));
        assert!(err.to_string().contains("undeclared identifier"));
    }

    #[test]
    fn device_error_messages() {
        assert_eq!(DeviceError::OutOfDeviceMemory.to_string(), "out of device memory");
        let err = DeviceError::ContextCreation("no default vertex array".into());
        assert!(err.to_string().starts_with("context creation failed"));
    }
}

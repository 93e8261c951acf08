use thiserror::Error;

use crate::types::CallSiteInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostErrorKind {
    Runtime,
    IllegalArgument,
    IllegalState,
    /// Anything the caller is not expected to handle by kind (I/O, parse, ...).
    Checked,
}

/// Failure raised by a host callable while it runs.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{message}")]
pub struct HostError {
    pub kind: HostErrorKind,
    pub message: String,
    pub cause: Option<Box<HostError>>,
}

impl HostError {
    pub fn new(kind: HostErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(HostErrorKind::Runtime, message)
    }

    pub fn illegal_argument(message: impl Into<String>) -> Self {
        Self::new(HostErrorKind::IllegalArgument, message)
    }

    pub fn checked(message: impl Into<String>) -> Self {
        Self::new(HostErrorKind::Checked, message)
    }

    pub fn caused_by(mut self, cause: HostError) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    pub fn innermost(&self) -> &HostError {
        let mut current = self;
        while let Some(cause) = current.cause.as_deref() {
            current = cause;
        }
        current
    }

    pub fn is_unchecked(&self) -> bool {
        !matches!(self.kind, HostErrorKind::Checked)
    }
}

#[derive(Debug, Error, Clone)]
pub enum IxError {
    /// No operation matches the requested name, shape or arity.
    #[error("{code} at {site}: {message}")]
    Resolution {
        code: &'static str,
        message: String,
        site: CallSiteInfo,
    },
    /// A resolved operation raised while executing.
    #[error("`{operation}` failed at {site}: {cause}")]
    Invocation {
        operation: String,
        site: CallSiteInfo,
        cause: HostError,
    },
    #[error("compilation failed at {site}: {message}")]
    Compilation { message: String, site: CallSiteInfo },
    #[error("invalid configuration: {message}")]
    Configuration { message: String },
    #[error("undefined variable `{name}` at {site}")]
    UnboundVariable { name: String, site: CallSiteInfo },
    #[error("{code} at {site}: {message}")]
    Evaluation {
        code: &'static str,
        message: String,
        site: CallSiteInfo,
    },
    #[error("{0}")]
    Host(HostError),
    #[error("illegal state: {message}")]
    IllegalState {
        message: String,
        cause: Option<HostError>,
    },
}

pub const RESOLVE_METHOD_NOT_FOUND: &str = "RESOLVE_METHOD_NOT_FOUND";
pub const RESOLVE_PROPERTY_NOT_FOUND: &str = "RESOLVE_PROPERTY_NOT_FOUND";
pub const RESOLVE_SETTER_NOT_FOUND: &str = "RESOLVE_SETTER_NOT_FOUND";
pub const RESOLVE_SHAPE_MISMATCH: &str = "RESOLVE_SHAPE_MISMATCH";
pub const EVAL_NULL_OPERAND: &str = "EVAL_NULL_OPERAND";
pub const EVAL_OPERAND_TYPE: &str = "EVAL_OPERAND_TYPE";
pub const EVAL_ASSIGN_TARGET: &str = "EVAL_ASSIGN_TARGET";

impl IxError {
    pub fn resolution(
        code: &'static str,
        message: impl Into<String>,
        site: &CallSiteInfo,
    ) -> Self {
        Self::Resolution {
            code,
            message: message.into(),
            site: site.clone(),
        }
    }

    pub fn invocation(operation: impl Into<String>, site: &CallSiteInfo, cause: HostError) -> Self {
        Self::Invocation {
            operation: operation.into(),
            site: site.clone(),
            cause,
        }
    }

    pub fn compilation(message: impl Into<String>, site: CallSiteInfo) -> Self {
        Self::Compilation {
            message: message.into(),
            site,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn evaluation(code: &'static str, message: impl Into<String>, site: &CallSiteInfo) -> Self {
        Self::Evaluation {
            code,
            message: message.into(),
            site: site.clone(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Resolution { code, .. } | Self::Evaluation { code, .. } => code,
            Self::Invocation { .. } => "INVOCATION_FAILED",
            Self::Compilation { .. } => "COMPILATION_FAILED",
            Self::Configuration { .. } => "CONFIGURATION_INVALID",
            Self::UnboundVariable { .. } => "VARIABLE_UNBOUND",
            Self::Host(_) => "HOST_ERROR",
            Self::IllegalState { .. } => "ILLEGAL_STATE",
        }
    }

    pub fn site(&self) -> Option<&CallSiteInfo> {
        match self {
            Self::Resolution { site, .. }
            | Self::Invocation { site, .. }
            | Self::Compilation { site, .. }
            | Self::UnboundVariable { site, .. }
            | Self::Evaluation { site, .. } => Some(site),
            Self::Configuration { .. } | Self::Host(_) | Self::IllegalState { .. } => None,
        }
    }

    pub fn is_resolution(&self) -> bool {
        matches!(self, Self::Resolution { .. })
    }

    pub fn is_invocation(&self) -> bool {
        matches!(self, Self::Invocation { .. })
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn innermost_walks_the_whole_cause_chain() {
        let error = HostError::checked("outer")
            .caused_by(HostError::runtime("middle").caused_by(HostError::illegal_argument("root")));
        assert_eq!(error.innermost().message, "root");
        assert_eq!(error.innermost().kind, HostErrorKind::IllegalArgument);
        assert!(!error.is_unchecked());
        assert!(error.innermost().is_unchecked());
    }

    #[test]
    fn codes_are_stable_per_variant() {
        let site = CallSiteInfo::new("main", 1, 2);
        assert_eq!(
            IxError::resolution(RESOLVE_METHOD_NOT_FOUND, "nope", &site).code(),
            "RESOLVE_METHOD_NOT_FOUND"
        );
        assert_eq!(
            IxError::invocation("f", &site, HostError::runtime("boom")).code(),
            "INVOCATION_FAILED"
        );
        assert_eq!(IxError::configuration("bad").code(), "CONFIGURATION_INVALID");
        assert_eq!(IxError::configuration("bad").site(), None);
    }

    #[test]
    fn display_carries_the_call_site() {
        let site = CallSiteInfo::new("main", 4, 9);
        let error = IxError::resolution(RESOLVE_PROPERTY_NOT_FOUND, "no `name` on int", &site);
        assert_eq!(
            error.to_string(),
            "RESOLVE_PROPERTY_NOT_FOUND at main:4:9: no `name` on int"
        );
        let error = IxError::invocation("explode", &site, HostError::runtime("boom"));
        assert_eq!(error.to_string(), "`explode` failed at main:4:9: boom");
    }
}

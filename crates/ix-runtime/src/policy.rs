use ix_core::error::EVAL_NULL_OPERAND;
use ix_core::{CallSiteInfo, HostError, IxError, Value};

/// How the interpreter treats failures. Chosen once per engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpreterPolicy {
    /// Lenient about missing values, strict about everything else, and
    /// unwraps host failures at the top level for older callers.
    StrictLegacy,
    Modern { silent: bool },
}

impl Default for InterpreterPolicy {
    fn default() -> Self {
        Self::Modern { silent: false }
    }
}

impl InterpreterPolicy {
    pub fn is_silent(self) -> bool {
        matches!(self, Self::Modern { silent: true })
    }

    pub fn is_legacy(self) -> bool {
        matches!(self, Self::StrictLegacy)
    }

    pub fn unbound_variable(self, name: &str, site: &CallSiteInfo) -> Result<Value, IxError> {
        match self {
            Self::StrictLegacy | Self::Modern { silent: true } => Ok(Value::Null),
            Self::Modern { silent: false } => Err(IxError::UnboundVariable {
                name: name.to_string(),
                site: site.clone(),
            }),
        }
    }

    pub fn null_operand(self, error: IxError) -> Result<Value, IxError> {
        match self {
            Self::StrictLegacy | Self::Modern { silent: true } => Ok(Value::Null),
            Self::Modern { silent: false } => Err(error),
        }
    }

    pub fn resolution_failed(self, error: IxError) -> Result<Value, IxError> {
        self.silence(error)
    }

    pub fn invocation_failed(self, error: IxError) -> Result<Value, IxError> {
        self.silence(error)
    }

    pub fn evaluation_failed(self, error: IxError) -> Result<Value, IxError> {
        self.silence(error)
    }

    fn silence(self, error: IxError) -> Result<Value, IxError> {
        if self.is_silent() {
            tracing::debug!(code = error.code(), %error, "silenced evaluation failure");
            return Ok(Value::Null);
        }
        Err(error)
    }

    /// Routes a failure raised by one operation to the matching hook.
    /// Compilation, configuration and host errors are never recovered.
    pub fn recover(self, error: IxError) -> Result<Value, IxError> {
        match error {
            IxError::UnboundVariable { ref name, ref site } => self.unbound_variable(name, site),
            IxError::Evaluation { code, .. } if code == EVAL_NULL_OPERAND => self.null_operand(error),
            IxError::Evaluation { .. } => self.evaluation_failed(error),
            IxError::Resolution { .. } => self.resolution_failed(error),
            IxError::Invocation { .. } => self.invocation_failed(error),
            IxError::Compilation { .. }
            | IxError::Configuration { .. }
            | IxError::Host(_)
            | IxError::IllegalState { .. } => Err(error),
        }
    }

    /// Applied once to the result of a whole script.
    pub fn finish(self, result: Result<Value, IxError>) -> Result<Value, IxError> {
        match (self, result) {
            (Self::StrictLegacy, Err(error)) => Err(unwrap_legacy(error)),
            (_, result) => result,
        }
    }
}

fn unwrap_legacy(error: IxError) -> IxError {
    match error {
        IxError::Invocation { cause, .. } => {
            let innermost = cause.innermost().clone();
            if innermost.is_unchecked() {
                IxError::Host(innermost)
            } else {
                illegal_state(innermost.message.clone(), Some(innermost))
            }
        }
        IxError::Resolution { .. } | IxError::Evaluation { .. } | IxError::UnboundVariable { .. } => {
            illegal_state(error.to_string(), None)
        }
        IxError::Compilation { .. }
        | IxError::Configuration { .. }
        | IxError::Host(_)
        | IxError::IllegalState { .. } => error,
    }
}

fn illegal_state(message: String, cause: Option<HostError>) -> IxError {
    IxError::IllegalState { message, cause }
}

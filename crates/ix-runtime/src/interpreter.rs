use ix_core::error::{EVAL_ASSIGN_TARGET, EVAL_NULL_OPERAND, EVAL_OPERAND_TYPE};
use ix_core::{CallSiteInfo, Expr, IxError, Script, Value};
use tracing::debug;

use crate::context::Context;
use crate::policy::InterpreterPolicy;
use crate::provider::ResolutionProvider;

/// Walks a compiled script against a context.
///
/// Every dynamic operation is resolved through the provider at the point it
/// is evaluated; failures are routed through the policy right there, so a
/// silenced failure yields `null` for that operation only.
pub struct Interpreter<'a> {
    provider: &'a dyn ResolutionProvider,
    policy: InterpreterPolicy,
    context: &'a mut dyn Context,
}

impl<'a> Interpreter<'a> {
    pub fn new(
        provider: &'a dyn ResolutionProvider,
        policy: InterpreterPolicy,
        context: &'a mut dyn Context,
    ) -> Self {
        Self {
            provider,
            policy,
            context,
        }
    }

    pub fn interpret(&mut self, script: &Script) -> Result<Value, IxError> {
        debug!(script = %script.name, policy = ?self.policy, "interpreting script");
        let result = self.eval(&script.body);
        self.policy.finish(result)
    }

    pub fn eval(&mut self, expr: &Expr) -> Result<Value, IxError> {
        let outcome = match expr {
            Expr::Literal { value, .. } => return Ok(value.clone()),
            Expr::Variable { name, site } => self.variable(name, site),
            Expr::Property { target, name, site } => self.property(target, name, site),
            Expr::MethodCall {
                target,
                name,
                args,
                site,
            } => self.method_call(target, name, args, site),
            Expr::Assign {
                target,
                value,
                site,
            } => self.assign(target, value, site),
            Expr::Add { left, right, site } => self.add(left, right, site),
            Expr::Foreach {
                variable,
                iterable,
                body,
                site,
            } => self.foreach(variable, iterable, body, site),
            Expr::Block { statements, .. } => {
                let mut last = Value::Null;
                for statement in statements {
                    last = self.eval(statement)?;
                }
                return Ok(last);
            }
        };
        outcome.or_else(|error| self.policy.recover(error))
    }

    fn variable(&mut self, name: &str, site: &CallSiteInfo) -> Result<Value, IxError> {
        self.context
            .get(name)
            .ok_or_else(|| IxError::UnboundVariable {
                name: name.to_string(),
                site: site.clone(),
            })
    }

    fn receiver(&mut self, target: &Expr, member: &str, site: &CallSiteInfo) -> Result<Value, IxError> {
        let value = self.eval(target)?;
        if value.is_null() {
            return Err(IxError::evaluation(
                EVAL_NULL_OPERAND,
                format!("cannot access `{}` on null", member),
                site,
            ));
        }
        Ok(value)
    }

    fn property(&mut self, target: &Expr, name: &str, site: &CallSiteInfo) -> Result<Value, IxError> {
        let value = self.receiver(target, name, site)?;
        self.provider
            .resolve_property_get(&value, name, site)?
            .invoke(&value, site)
    }

    fn method_call(
        &mut self,
        target: &Expr,
        name: &str,
        args: &[Expr],
        site: &CallSiteInfo,
    ) -> Result<Value, IxError> {
        let value = self.receiver(target, name, site)?;
        let args = args
            .iter()
            .map(|arg| self.eval(arg))
            .collect::<Result<Vec<_>, _>>()?;
        self.provider
            .resolve_method(&value, name, &args, site)?
            .invoke(&value, &args, site)
    }

    fn assign(&mut self, target: &Expr, value: &Expr, site: &CallSiteInfo) -> Result<Value, IxError> {
        match target {
            Expr::Variable { name, .. } => {
                let assigned = self.eval(value)?;
                self.context.set(name, assigned.clone());
                Ok(assigned)
            }
            Expr::Property {
                target: object,
                name,
                site: property_site,
            } => {
                let receiver = self.receiver(object, name, property_site)?;
                let assigned = self.eval(value)?;
                self.provider
                    .resolve_property_set(&receiver, name, &assigned, site)?
                    .invoke(&receiver, assigned.clone(), site)?;
                Ok(assigned)
            }
            other => Err(IxError::evaluation(
                EVAL_ASSIGN_TARGET,
                format!("cannot assign to {}", describe(other)),
                site,
            )),
        }
    }

    fn add(&mut self, left: &Expr, right: &Expr, site: &CallSiteInfo) -> Result<Value, IxError> {
        let left = self.eval(left)?;
        let right = self.eval(right)?;
        match (&left, &right) {
            (Value::String(_), _) | (_, Value::String(_)) => {
                Ok(Value::String(format!("{}{}", left, right)))
            }
            (Value::Int(a), Value::Int(b)) => Ok(a
                .checked_add(*b)
                .map(Value::Int)
                .unwrap_or(Value::Float(*a as f64 + *b as f64))),
            (Value::Null, _) | (_, Value::Null) => Err(IxError::evaluation(
                EVAL_NULL_OPERAND,
                "null operand in addition",
                site,
            )),
            _ => match (left.as_float(), right.as_float()) {
                (Some(a), Some(b)) => Ok(Value::Float(a + b)),
                _ => Err(IxError::evaluation(
                    EVAL_OPERAND_TYPE,
                    format!("cannot add {} and {}", left.type_name(), right.type_name()),
                    site,
                )),
            },
        }
    }

    fn foreach(
        &mut self,
        variable: &str,
        iterable: &Expr,
        body: &Expr,
        site: &CallSiteInfo,
    ) -> Result<Value, IxError> {
        let items = self.eval(iterable)?;
        let mut adapter = self.provider.resolve_iteration(&items, site)?;
        for item in adapter.by_ref() {
            self.context.set(variable, item);
            // an early return drops the adapter, which releases it
            self.eval(body)?;
        }
        adapter.release();
        Ok(Value::Null)
    }
}

fn describe(expr: &Expr) -> &'static str {
    match expr {
        Expr::Literal { .. } => "a literal",
        Expr::Variable { .. } => "a variable",
        Expr::Property { .. } => "a property",
        Expr::MethodCall { .. } => "a method call",
        Expr::Assign { .. } => "an assignment",
        Expr::Add { .. } => "an addition",
        Expr::Foreach { .. } => "a loop",
        Expr::Block { .. } => "a block",
    }
}

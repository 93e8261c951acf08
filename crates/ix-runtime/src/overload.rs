//! Best-fit selection among same-named candidates.
//!
//! A candidate is applicable when its arity fits (exactly, or for a variadic
//! candidate at least `params - 1` arguments) and every argument is
//! assignable to the parameter at its position. Among applicable candidates
//! the maximally specific ones survive: no other applicable candidate is
//! strictly more specific on every position. Fixed arity beats variadic at
//! equal specificity. Remaining ties go to declaration order.

use std::sync::Arc;

use ix_core::{MethodDescriptor, ParamType, Value};

fn param_at(method: &MethodDescriptor, position: usize) -> &ParamType {
    if method.variadic && position + 1 >= method.params.len() {
        return &method.params[method.params.len() - 1];
    }
    &method.params[position]
}

pub(crate) fn arity_fits(method: &MethodDescriptor, arg_count: usize) -> bool {
    if method.variadic {
        arg_count + 1 >= method.params.len()
    } else {
        arg_count == method.params.len()
    }
}

pub(crate) fn is_applicable(method: &MethodDescriptor, args: &[Value]) -> bool {
    arity_fits(method, args.len())
        && args
            .iter()
            .enumerate()
            .all(|(position, arg)| param_at(method, position).accepts(arg))
}

fn at_least_as_specific(left: &MethodDescriptor, right: &MethodDescriptor, arg_count: usize) -> bool {
    (0..arg_count).all(|position| param_at(left, position).is_subtype_of(param_at(right, position)))
}

fn strictly_more_specific(left: &MethodDescriptor, right: &MethodDescriptor, arg_count: usize) -> bool {
    if !at_least_as_specific(left, right, arg_count) {
        return false;
    }
    !at_least_as_specific(right, left, arg_count) || (!left.variadic && right.variadic)
}

pub(crate) fn best_fit(
    candidates: Vec<Arc<MethodDescriptor>>,
    args: &[Value],
) -> Option<Arc<MethodDescriptor>> {
    let applicable = candidates
        .into_iter()
        .filter(|method| is_applicable(method, args))
        .collect::<Vec<_>>();

    let mut maximal = applicable
        .iter()
        .filter(|method| {
            !applicable
                .iter()
                .any(|other| strictly_more_specific(other, method, args.len()))
        })
        .cloned()
        .collect::<Vec<_>>();
    maximal.sort_by_key(|method| method.index);
    maximal.into_iter().next()
}

/// Arguments as the callable receives them: trailing variadic arguments are
/// packed into one array.
pub(crate) fn pack_arguments(method: &MethodDescriptor, args: &[Value]) -> Vec<Value> {
    if !method.variadic {
        return args.to_vec();
    }
    let fixed = method.params.len() - 1;
    let mut packed = args[..fixed].to_vec();
    packed.push(Value::Array(args[fixed..].to_vec()));
    packed
}

#[cfg(test)]
mod overload_tests {
    use super::*;
    use ix_core::ClassBuilder;

    fn candidates(class: &ix_core::ClassDescriptor, name: &str) -> Vec<Arc<MethodDescriptor>> {
        class
            .methods()
            .iter()
            .filter(|method| method.name == name)
            .cloned()
            .collect()
    }

    #[test]
    fn integer_beats_number_only_for_integer_arguments() {
        let class = ClassBuilder::<Value>::new("Calc")
            .method("f", &[ParamType::Number], |_, _| Ok(Value::from("number")))
            .method("f", &[ParamType::Integer], |_, _| Ok(Value::from("integer")))
            .build();
        let picked = best_fit(candidates(&class, "f"), &[Value::Int(1)]).expect("int fits");
        assert_eq!(picked.params, vec![ParamType::Integer]);
        let picked = best_fit(candidates(&class, "f"), &[Value::Float(1.5)]).expect("float fits");
        assert_eq!(picked.params, vec![ParamType::Number]);
    }

    #[test]
    fn incomparable_candidates_fall_back_to_declaration_order() {
        let class = ClassBuilder::<Value>::new("Pair")
            .method("g", &[ParamType::Integer, ParamType::Any], |_, _| Ok(Value::Null))
            .method("g", &[ParamType::Any, ParamType::Integer], |_, _| Ok(Value::Null))
            .build();
        let picked = best_fit(candidates(&class, "g"), &[Value::Int(1), Value::Int(2)])
            .expect("both apply");
        assert_eq!(picked.index, 0);
    }

    #[test]
    fn fixed_arity_beats_variadic_and_variadic_packs_the_tail() {
        let class = ClassBuilder::<Value>::new("Join")
            .variadic_method("join", &[ParamType::String, ParamType::Any], |_, _| Ok(Value::Null))
            .method("join", &[ParamType::String, ParamType::Any], |_, _| Ok(Value::Null))
            .build();
        let args = [Value::from(","), Value::Int(1)];
        let picked = best_fit(candidates(&class, "join"), &args).expect("fits");
        assert!(!picked.variadic);

        let args = [Value::from(","), Value::Int(1), Value::Int(2)];
        let picked = best_fit(candidates(&class, "join"), &args).expect("only variadic fits");
        assert!(picked.variadic);
        assert_eq!(
            pack_arguments(&picked, &args),
            vec![Value::from(","), Value::Array(vec![Value::Int(1), Value::Int(2)])]
        );
        assert_eq!(
            pack_arguments(&picked, &args[..1]),
            vec![Value::from(","), Value::Array(vec![])]
        );
    }

    #[test]
    fn nothing_applicable_yields_none() {
        let class = ClassBuilder::<Value>::new("Only")
            .method("h", &[ParamType::Bool], |_, _| Ok(Value::Null))
            .build();
        assert!(best_fit(candidates(&class, "h"), &[Value::from("x")]).is_none());
        assert!(best_fit(candidates(&class, "h"), &[]).is_none());
    }
}

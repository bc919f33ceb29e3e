//! Call dispatch.

use smallvec::SmallVec;

use super::frame::{CallArgs, Frame};
use super::Interpreter;
use crate::builtins::{BuiltinContext, BuiltinFunction};
use crate::errors::{
    default_constructor_only, not_callable, recursion_limit_exceeded, wrong_arg_count, EvalResult,
};
use crate::value::{Address, ClassObject, FunctionObject, Heap, Object};

impl Frame<'_> {
    /// Call `callee` with `args` (source order) and return its result.
    #[tracing::instrument(level = "debug", skip_all, fields(callee = callee.type_name(), args = args.len()))]
    pub(super) fn invoke(
        &mut self,
        rt: &mut Interpreter,
        callee: &Object,
        args: CallArgs,
    ) -> EvalResult {
        match callee {
            Object::Function(function) => self.call_function(rt, callee, function, args),
            Object::Class(class) => self.construct(rt, class, args),
            Object::Method(method) => {
                let mut full: CallArgs = SmallVec::with_capacity(args.len() + 1);
                full.push(Address::new(method.receiver.clone()));
                full.extend(args);
                self.invoke(rt, &method.function, full)
            }
            Object::Builtin(builtin) => call_builtin(rt, *builtin, &args),
            _ => Err(not_callable(callee.type_name())),
        }
    }

    /// Run a user function in a child frame over a fresh child of its
    /// captured scope.
    ///
    /// Missing trailing arguments are padded with `0`. Pads go on the
    /// stack first, then the arguments last-to-first, so the first argument
    /// is on top for the body's leading `Bind`.
    fn call_function(
        &self,
        rt: &mut Interpreter,
        callee: &Object,
        function: &FunctionObject,
        args: CallArgs,
    ) -> EvalResult {
        if args.len() > function.arity {
            return Err(wrong_arg_count(
                &function.label(),
                function.arity,
                args.len(),
            ));
        }
        let depth = rt.depth + 1;
        if !rt.config.allows_depth(depth) {
            return Err(recursion_limit_exceeded(
                rt.config.max_call_depth.unwrap_or(depth),
            ));
        }

        let scope = rt.new_scope(Some(function.scope.clone()));
        let mut child = Frame::new(
            Some(self),
            function.code.clone(),
            scope,
            Some(callee.clone()),
        );
        for _ in args.len()..function.arity {
            child.push(Address::new(Object::Int(0)));
        }
        for arg in args.into_iter().rev() {
            child.push(arg);
        }

        rt.depth = depth;
        let result = anole_stack::ensure_sufficient_stack(|| child.execute(rt, function.base));
        rt.depth = depth - 1;
        result
    }

    /// Instantiate `class`: seed a fresh member scope from the class
    /// members, then run `__init__` (if any) with the instance as the
    /// leading argument, discarding its result.
    fn construct(
        &mut self,
        rt: &mut Interpreter,
        class: &Heap<ClassObject>,
        args: CallArgs,
    ) -> EvalResult {
        let scope = rt.new_scope(None);
        {
            let members = class.scope.borrow();
            let mut slots = scope.borrow_mut();
            for (name, address) in members.symbols() {
                slots.define_symbol(name, Address::new(address.get()));
            }
        }
        let instance = Object::instance(class.clone(), scope);

        let init = class.scope.borrow().find_local("__init__");
        match init {
            Some(init) => {
                let mut full: CallArgs = SmallVec::with_capacity(args.len() + 1);
                full.push(Address::new(instance.clone()));
                full.extend(args);
                // Rooted on this frame's stack until `__init__` returns.
                let rooted = self.stack_len();
                self.push(Address::new(instance.clone()));
                let result = self.invoke(rt, &init.get(), full);
                self.truncate_stack(rooted);
                result?;
            }
            None if !args.is_empty() => {
                return Err(default_constructor_only(&class.name, args.len()));
            }
            None => {}
        }
        Ok(instance)
    }
}

fn call_builtin(rt: &mut Interpreter, builtin: BuiltinFunction, args: &[Address]) -> EvalResult {
    let objects: SmallVec<[Object; 4]> = args.iter().map(Address::get).collect();
    let ctx = BuiltinContext {
        print: &rt.print_handler,
    };
    let result = builtin.invoke(&ctx, &objects)?;
    rt.track(&result);
    Ok(result)
}

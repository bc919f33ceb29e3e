//! Frames and the instruction loop.

use anole_ir::{Instruction, SharedCode};
use smallvec::SmallVec;

use super::Interpreter;
use crate::collector::Visitor;
use crate::errors::{scope_underflow, stack_underflow, unsupported, EvalError, EvalResult};
use crate::operators::evaluate_binary;
use crate::scope::{LocalScope, Scope};
use crate::unary_operators::evaluate_unary;
use crate::value::{Address, ClassObject, Heap, Object};

/// Call arguments in source order. Most calls take few arguments.
pub(super) type CallArgs = SmallVec<[Address; 4]>;

/// What the loop does after an instruction.
enum Flow {
    Next,
    Jump(usize),
    Return(Object),
}

/// One activation: operand stack, current scope and a borrowed link to the
/// caller.
pub(crate) struct Frame<'c> {
    caller: Option<&'c Frame<'c>>,
    code: SharedCode,
    scope: LocalScope<Scope>,
    stack: Vec<Address>,
    /// Function being executed; `None` for the top-level frame.
    callee: Option<Object>,
}

impl<'c> Frame<'c> {
    pub(crate) fn new(
        caller: Option<&'c Frame<'c>>,
        code: SharedCode,
        scope: LocalScope<Scope>,
        callee: Option<Object>,
    ) -> Self {
        Frame {
            caller,
            code,
            scope,
            stack: Vec::new(),
            callee,
        }
    }

    /// Run from `base` until `Return` or the end of the code.
    ///
    /// Falling off the end, or returning with an empty operand stack,
    /// yields `none`. A fault is tagged with this frame's name and pc, then
    /// handed to the caller unchanged.
    pub(crate) fn execute(&mut self, rt: &mut Interpreter, base: usize) -> EvalResult {
        let code = self.code.clone();
        let mut pc = base;
        loop {
            if rt.collector.should_collect() {
                rt.collect_at(self);
            }
            let Some(instruction) = code.get(pc) else {
                return Ok(Object::None);
            };
            tracing::trace!(pc, %instruction, depth = rt.depth, "step");
            match self.step(rt, instruction, pc) {
                Ok(Flow::Next) => pc += 1,
                Ok(Flow::Jump(target)) => pc = target,
                Ok(Flow::Return(value)) => return Ok(value),
                Err(err) => return Err(err.with_frame(self.label(), pc)),
            }
        }
    }

    fn step(
        &mut self,
        rt: &mut Interpreter,
        instruction: &Instruction,
        pc: usize,
    ) -> Result<Flow, EvalError> {
        match instruction {
            Instruction::Push(literal) => {
                self.push(Address::new(Object::from_literal(literal)));
            }
            Instruction::Pop => {
                self.pop("pop")?;
            }
            Instruction::Dup => {
                let top = self.stack.last().cloned().ok_or_else(|| stack_underflow("dup"))?;
                self.push(top);
            }
            Instruction::Create(name) => {
                self.scope.borrow_mut().create_symbol(name);
            }
            Instruction::Load(name) => {
                let address = self.scope.borrow_mut().load_symbol(name);
                self.push(address);
            }
            Instruction::Store => {
                let value = self.pop("store")?;
                let target = self.pop("store")?;
                target.bind(value.get());
                self.push(target);
            }
            Instruction::Bind(name) => {
                let value = self.pop("bind")?;
                self.scope
                    .borrow_mut()
                    .define_symbol(name, Address::new(value.get()));
            }
            Instruction::BindRef(name) => {
                let cell = self.pop("bindref")?;
                self.scope.borrow_mut().define_symbol(name, cell);
            }
            Instruction::Unary(op) => {
                let operand = self.pop("unary")?;
                let result = evaluate_unary(&operand.get(), *op)?;
                self.push(Address::new(result));
            }
            Instruction::Binary(op) => {
                let rhs = self.pop("binary")?;
                let lhs = self.pop("binary")?;
                let result = evaluate_binary(&lhs.get(), &rhs.get(), *op)?;
                rt.track(&result);
                self.push(Address::new(result));
            }
            Instruction::ScopeBegin => {
                self.scope = rt.new_scope(Some(self.scope.clone()));
            }
            Instruction::ScopeEnd => {
                self.scope = self.leave_scope()?;
            }
            Instruction::Jump(target) => return Ok(Flow::Jump(*target)),
            Instruction::JumpIf(target) => {
                if self.pop("jumpif")?.with(Object::to_bool) {
                    return Ok(Flow::Jump(*target));
                }
            }
            Instruction::JumpIfNot(target) => {
                if !self.pop("jumpifnot")?.with(Object::to_bool) {
                    return Ok(Flow::Jump(*target));
                }
            }
            Instruction::Call(count) => {
                let callee = self.pop("call")?.get();
                let args = self.pop_args(*count, "call")?;
                let result = self.invoke(rt, &callee, args)?;
                self.push(Address::new(result));
            }
            Instruction::Return => {
                let value = self.stack.pop().map_or(Object::None, |top| top.get());
                return Ok(Flow::Return(value));
            }
            Instruction::LambdaDecl { arity, end } => {
                let function =
                    Object::function(self.code.clone(), self.scope.clone(), pc + 1, *arity);
                self.push(Address::new(function));
                return Ok(Flow::Jump(*end));
            }
            Instruction::BuildList(count) => {
                let items = self
                    .pop_args(*count, "buildlist")?
                    .into_iter()
                    .map(|item| Address::new(item.get()))
                    .collect();
                let list = Object::list(items);
                rt.track(&list);
                self.push(Address::new(list));
            }
            Instruction::BuildDict(count) => {
                let flat = self.pop_args(count.saturating_mul(2), "builddict")?;
                let dict = Object::dict();
                if let Object::Dict(body) = &dict {
                    for pair in flat.chunks_exact(2) {
                        body.insert(pair[0].get(), Address::new(pair[1].get()));
                    }
                }
                rt.track(&dict);
                self.push(Address::new(dict));
            }
            Instruction::Index => {
                let index = self.pop("index")?;
                let container = self.pop("index")?;
                let cell = container
                    .get()
                    .index(&index.get(), rt.config.missing_key)?;
                self.push(cell);
            }
            Instruction::LoadMember(name) => {
                let object = self.pop("loadmember")?;
                let member = object.get().load_member(name)?;
                self.push(member);
            }
            Instruction::BuildClass { name, bases } => {
                let members = self.scope.clone();
                self.scope = self.leave_scope()?;
                let bases = self.pop_bases(*bases)?;
                if let Some(base) = bases.last() {
                    inherit(&members, base);
                }
                self.push(Address::new(Object::class(name.as_str(), members)));
            }
            Instruction::BuildEnum => {
                let members = self.scope.clone();
                self.scope = self.leave_scope()?;
                self.push(Address::new(Object::enumeration(members)));
            }
        }
        Ok(Flow::Next)
    }

    #[inline]
    pub(super) fn push(&mut self, address: Address) {
        self.stack.push(address);
    }

    #[inline]
    pub(super) fn stack_len(&self) -> usize {
        self.stack.len()
    }

    pub(super) fn truncate_stack(&mut self, len: usize) {
        self.stack.truncate(len);
    }

    #[inline]
    fn pop(&mut self, instruction: &'static str) -> Result<Address, EvalError> {
        self.stack.pop().ok_or_else(|| stack_underflow(instruction))
    }

    /// Pop `count` entries and return them in push order.
    fn pop_args(&mut self, count: usize, instruction: &'static str) -> Result<CallArgs, EvalError> {
        let split = self
            .stack
            .len()
            .checked_sub(count)
            .ok_or_else(|| stack_underflow(instruction))?;
        Ok(self.stack.drain(split..).collect())
    }

    fn pop_bases(&mut self, count: usize) -> Result<Vec<Heap<ClassObject>>, EvalError> {
        self.pop_args(count, "buildclass")?
            .into_iter()
            .map(|base| match base.get() {
                Object::Class(class) => Ok(class),
                other => Err(unsupported("use as a base class", other.type_name())),
            })
            .collect()
    }

    fn leave_scope(&self) -> Result<LocalScope<Scope>, EvalError> {
        self.scope
            .borrow()
            .parent()
            .cloned()
            .ok_or_else(scope_underflow)
    }

    /// Name used in backtraces.
    pub(super) fn label(&self) -> String {
        match &self.callee {
            Some(Object::Function(function)) => format!("<{}>", function.label()),
            _ => "<main>".to_string(),
        }
    }

    /// Report this frame and every caller as collector roots.
    pub(crate) fn trace_roots(&self, visitor: &mut dyn Visitor) {
        let mut frame = Some(self);
        while let Some(current) = frame {
            visitor.visit_scope(&current.scope);
            for address in &current.stack {
                visitor.visit_address(address);
            }
            if let Some(callee) = &current.callee {
                visitor.visit_object(callee);
            }
            frame = current.caller;
        }
    }
}

/// Copy the members of `base` that `members` does not define itself.
fn inherit(members: &LocalScope<Scope>, base: &Heap<ClassObject>) {
    let inherited: Vec<(String, Object)> = base
        .scope
        .borrow()
        .symbols()
        .map(|(name, address)| (name.to_string(), address.get()))
        .collect();
    let mut members = members.borrow_mut();
    for (name, object) in inherited {
        if members.find_local(&name).is_none() {
            members.define_symbol(&name, Address::new(object));
        }
    }
}

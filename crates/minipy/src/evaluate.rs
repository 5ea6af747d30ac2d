//! Tree-walking evaluation of prepared statements.

use smallvec::SmallVec;

use crate::{
    args::ArgValues,
    binary::{binary_op, unary_op},
    exception_private::{ExcType, RunResult},
    expressions::{Expr, ExprLoc, Identifier, Literal, Node},
    heap::{Heap, HeapData},
    io::PrintWriter,
    namespace::Namespace,
    resource::ResourceTracker,
    types::{
        Complex, Dict, LongInt, list::allocate_list, str::allocate_str, tuple::allocate_tuple,
    },
    value::Value,
};

/// Evaluates statements against one heap and module namespace.
pub(crate) struct Evaluator<'a, T: ResourceTracker, P: PrintWriter> {
    heap: &'a mut Heap<T>,
    namespace: &'a mut Namespace,
    print: &'a mut P,
}

impl<'a, T: ResourceTracker, P: PrintWriter> Evaluator<'a, T, P> {
    pub fn new(heap: &'a mut Heap<T>, namespace: &'a mut Namespace, print: &'a mut P) -> Self {
        Self { heap, namespace, print }
    }

    /// Fails with `TimeoutError` once the tracker's time budget is spent.
    pub fn check_time(&mut self) -> RunResult<()> {
        self.heap.tracker_mut().check_time()?;
        Ok(())
    }

    /// Executes one statement.
    ///
    /// Returns the value of an expression statement, `None` for an assignment.
    pub fn execute(&mut self, node: &Node) -> RunResult<Option<Value>> {
        match node {
            Node::Expr(expr) => self.evaluate(expr).map(Some),
            Node::Assign { target, object } => {
                let value = self.evaluate(object)?;
                // every assignment target gets a slot during prepare
                if let Some(slot) = target.slot {
                    self.namespace.set(slot, value);
                }
                Ok(None)
            }
        }
    }

    fn evaluate(&mut self, expr_loc: &ExprLoc) -> RunResult<Value> {
        match &expr_loc.expr {
            Expr::Literal(literal) => self.literal(literal),
            Expr::Name(ident) => self.load_name(ident),
            Expr::Call { callable, args } => {
                let callable = self.evaluate(callable)?;
                let args = self.evaluate_all(args)?;
                match callable {
                    Value::Builtin(builtin) => builtin.call(self.heap, ArgValues::from_vec(args), self.print),
                    other => Err(ExcType::type_error_not_callable(other.py_type(self.heap))),
                }
            }
            Expr::Op { left, op, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                binary_op(*op, left, right, self.heap)
            }
            Expr::Unary { op, operand } => {
                let operand = self.evaluate(operand)?;
                unary_op(*op, operand, self.heap)
            }
            Expr::Tuple(items) => {
                let items = self.evaluate_all(items)?;
                allocate_tuple(SmallVec::from_vec(items), self.heap)
            }
            Expr::List(items) => {
                let items = self.evaluate_all(items)?;
                allocate_list(items, self.heap)
            }
            Expr::Dict(pairs) => {
                let mut dict = Dict::new();
                for (key, value) in pairs {
                    let key = self.evaluate(key)?;
                    let value = self.evaluate(value)?;
                    dict.set(key, value, self.heap)?;
                }
                let id = self.heap.allocate(HeapData::Dict(dict))?;
                Ok(Value::Ref(id))
            }
        }
    }

    fn evaluate_all(&mut self, exprs: &[ExprLoc]) -> RunResult<Vec<Value>> {
        exprs.iter().map(|expr| self.evaluate(expr)).collect()
    }

    fn literal(&mut self, literal: &Literal) -> RunResult<Value> {
        match literal {
            Literal::None => Ok(Value::None),
            Literal::Bool(b) => Ok(Value::Bool(*b)),
            Literal::Int(i) => Ok(Value::Int(*i)),
            Literal::LongInt(bi) => LongInt::new(bi.clone()).into_value(self.heap),
            Literal::Float(f) => Ok(Value::Float(*f)),
            Literal::Imag(f) => Complex::new(0.0, *f).into_value(self.heap),
            Literal::Str(s) => allocate_str(s.clone(), self.heap),
        }
    }

    /// Global slot if bound, otherwise the builtin of the same name.
    fn load_name(&self, ident: &Identifier) -> RunResult<Value> {
        if let Some(value) = ident.slot.and_then(|slot| self.namespace.get(slot)) {
            return Ok(value);
        }
        match ident.builtin {
            Some(builtin) => Ok(Value::Builtin(builtin)),
            None => Err(ExcType::name_error(&ident.name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{io::CollectStringPrint, parse::parse, prepare::prepare, resource::NoLimitTracker};

    /// Runs `code` and returns printed output plus the repr of the last statement's value.
    fn eval(code: &str) -> RunResult<(String, String)> {
        let prepared = prepare(parse(code).unwrap());
        let mut heap = Heap::new(16, NoLimitTracker);
        let mut namespace = Namespace::new(prepared.namespace_size);
        let mut print = CollectStringPrint::new();
        let mut last = None;
        {
            let mut evaluator = Evaluator::new(&mut heap, &mut namespace, &mut print);
            for node in &prepared.nodes {
                last = evaluator.execute(node)?;
            }
        }
        let last = last.map_or_else(String::new, |value| value.py_repr(&heap));
        Ok((print.into_output(), last))
    }

    #[test]
    fn assignment_shadows_builtin_from_that_point() {
        let (out, _) = eval("print(str(1))\nstr = 'gulfem'\nprint(len(str))").unwrap();
        assert_eq!(out, "1\n6\n");
    }

    #[test]
    fn displays_build_containers() {
        let (_, last) = eval("(1, [2, 'x'], {'a': 1.5, 2: None})").unwrap();
        assert_eq!(last, "(1, [2, 'x'], {'a': 1.5, 2: None})");
    }

    #[test]
    fn imaginary_literals_make_complex_numbers() {
        let (_, last) = eval("2 + 3j").unwrap();
        assert_eq!(last, "(2+3j)");
    }

    #[test]
    fn unbound_name_is_a_name_error() {
        let err = eval("print(missing)").unwrap_err();
        assert_eq!(
            err.into_python_exception("test.py", "").summary(),
            "NameError: name 'missing' is not defined"
        );
    }

    #[test]
    fn calling_a_non_callable() {
        let err = eval("x = 5\nx(1)").unwrap_err();
        assert_eq!(
            err.into_python_exception("test.py", "").summary(),
            "TypeError: 'int' object is not callable"
        );
    }

    #[test]
    fn assigned_name_read_before_assignment_without_builtin() {
        let err = eval("print(x)\nx = 1").unwrap_err();
        assert_eq!(
            err.into_python_exception("test.py", "").summary(),
            "NameError: name 'x' is not defined"
        );
    }
}

//! Public interface for running minipy code.

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::{
    Exception,
    evaluate::Evaluator,
    exception_private::RunResult,
    expressions::Node,
    heap::Heap,
    io::{PrintWriter, StdPrint},
    namespace::Namespace,
    object::Object,
    parse::parse,
    prepare::prepare,
    resource::{NoLimitTracker, ResourceTracker},
    value::Value,
};

/// Primary interface for running minipy code.
///
/// Parsing and name resolution happen once in [`Runner::new`]; every run gets
/// a fresh heap and namespace, so a runner can be executed any number of times.
///
/// # Example
/// ```
/// use minipy::{CollectStringPrint, NoLimitTracker, Object, Runner};
///
/// let runner = Runner::new("x = len('gulfem')\nprint(x)\nx + 1".to_owned(), "test.py").unwrap();
/// let mut print = CollectStringPrint::new();
/// let result = runner.run(NoLimitTracker, &mut print).unwrap();
/// assert_eq!(result, Object::Int(7));
/// assert_eq!(print.output(), "6\n");
/// ```
#[derive(Debug, Clone)]
pub struct Runner {
    /// The underlying executor containing the prepared statements.
    executor: Executor,
}

impl Runner {
    /// Parses and prepares the given code.
    ///
    /// # Arguments
    /// * `code` - The Python code to execute
    /// * `script_name` - The script name for error messages
    ///
    /// # Errors
    /// Returns `Exception` (`SyntaxError`, `IndentationError` or
    /// `NotImplementedError`) if the code cannot be parsed.
    pub fn new(code: String, script_name: &str) -> Result<Self, Exception> {
        Executor::new(code, script_name).map(|executor| Self { executor })
    }

    /// Returns the code that was parsed to create this runner.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.executor.code
    }

    /// Executes the code to completion.
    ///
    /// Returns the value of the final statement when it is an expression,
    /// `Object::None` otherwise.
    ///
    /// # Arguments
    /// * `resource_tracker` - Custom resource tracker implementation
    /// * `print` - Destination for `print()` output
    pub fn run(&self, resource_tracker: impl ResourceTracker, print: &mut impl PrintWriter) -> Result<Object, Exception> {
        self.executor
            .run(resource_tracker, print, false)
            .map(|output| output.value)
    }

    /// Executes the code to completion with no resource limits, printing to stdout.
    pub fn run_no_limits(&self) -> Result<Object, Exception> {
        self.run(NoLimitTracker, &mut StdPrint)
    }

    /// Executes the code to completion and also returns the final module globals.
    ///
    /// Globals are listed in first-assignment order; names whose assignment
    /// never ran are omitted.
    pub fn run_with_globals(
        &self,
        resource_tracker: impl ResourceTracker,
        print: &mut impl PrintWriter,
    ) -> Result<RunOutput, Exception> {
        self.executor.run(resource_tracker, print, true)
    }
}

/// Result of [`Runner::run_with_globals`].
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RunOutput {
    /// Value of the final statement when it is an expression.
    pub value: Object,
    /// Module globals by name.
    pub globals: IndexMap<String, Object>,
}

/// Prepared program plus the source it came from.
#[derive(Debug, Clone)]
struct Executor {
    code: String,
    script_name: String,
    namespace_size: usize,
    /// Global names indexed by slot.
    slot_names: Vec<String>,
    nodes: Vec<Node>,
}

impl Executor {
    fn new(code: String, script_name: &str) -> Result<Self, Exception> {
        let nodes = parse(&code).map_err(|err| err.into_python_exc(script_name, &code))?;
        let prepared = prepare(nodes);
        debug!(
            script = script_name,
            statements = prepared.nodes.len(),
            globals = prepared.namespace_size,
            "prepared program"
        );
        Ok(Self {
            code,
            script_name: script_name.to_owned(),
            namespace_size: prepared.namespace_size,
            slot_names: prepared.slot_names,
            nodes: prepared.nodes,
        })
    }

    fn run<T: ResourceTracker>(
        &self,
        resource_tracker: T,
        print: &mut impl PrintWriter,
        collect_globals: bool,
    ) -> Result<RunOutput, Exception> {
        let mut heap = Heap::new(self.nodes.len(), resource_tracker);
        let mut namespace = Namespace::new(self.namespace_size);

        let last = match self.execute(&mut heap, &mut namespace, print) {
            Ok(last) => last,
            Err(err) => {
                let exc = err.into_python_exception(&self.script_name, &self.code);
                debug!(script = %self.script_name, error = %exc.summary(), "run failed");
                return Err(exc);
            }
        };

        let value = last.map_or(Object::None, |value| Object::from_value(value, &heap));
        let globals = if collect_globals {
            namespace
                .bound()
                .filter_map(|(slot, value)| {
                    let name = self.slot_names.get(slot.index())?;
                    Some((name.clone(), Object::from_value(value, &heap)))
                })
                .collect()
        } else {
            IndexMap::new()
        };
        debug!(
            script = %self.script_name,
            heap_objects = heap.len(),
            allocations = ?heap.tracker().allocation_count(),
            "run finished"
        );
        Ok(RunOutput { value, globals })
    }

    fn execute<T: ResourceTracker>(
        &self,
        heap: &mut Heap<T>,
        namespace: &mut Namespace,
        print: &mut impl PrintWriter,
    ) -> RunResult<Option<Value>> {
        let mut evaluator = Evaluator::new(heap, namespace, print);
        let mut last = None;
        for node in &self.nodes {
            let position = node.position();
            trace!(line = position.line, "executing statement");
            evaluator.check_time().map_err(|err| err.with_position(position))?;
            last = evaluator.execute(node).map_err(|err| err.with_position(position))?;
        }
        Ok(last)
    }
}

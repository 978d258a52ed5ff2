//! TemplateSelector - Rhai expression evaluated against each message.

use crate::builtin::register_builtin_functions;
use cf_error::SelectorError;
use cf_types::LogMessage;
use rhai::{Array, Dynamic, Engine, Map, Scope, AST};
use tracing::{debug, trace};

/// Name of the scope constant holding the known database selectors.
const SELECTORS_VAR: &str = "selectors";

/// Name of the scope variable holding the current message.
const RECORD_VAR: &str = "record";

/// Scope length before the per-message `record` variable is pushed.
const BASE_SCOPE_LEN: usize = 1;

/// Computes selectors by evaluating a Rhai expression.
///
/// The message fields are visible as the `record` map (values decoded as
/// lossy UTF-8), and the selectors of the loaded database as the read-only
/// `selectors` array:
///
/// ```text
/// if record.host in selectors { record.host } else { short_hostname(record.host) }
/// ```
///
/// Each instance owns its engine and evaluation scope; clones get fresh ones.
pub struct TemplateSelector {
    /// Expression source, kept for cloning and diagnostics.
    expression: String,

    /// Pre-compiled AST for repeated evaluation.
    ast: AST,

    /// Rhai engine with registered functions.
    engine: Engine,

    /// Per-instance evaluation scratch.
    scope: Scope<'static>,

    /// Selectors passed to `initialize`.
    known_selectors: Array,
}

impl std::fmt::Debug for TemplateSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateSelector")
            .field("expression", &self.expression)
            .field("known_selectors", &self.known_selectors.len())
            .finish_non_exhaustive()
    }
}

impl TemplateSelector {
    /// Compiles a selector expression.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::Empty`] for a blank expression and
    /// [`SelectorError::Compilation`] if the expression does not parse.
    pub fn compile(expression: impl Into<String>) -> Result<Self, SelectorError> {
        let expression = expression.into();
        if expression.trim().is_empty() {
            return Err(SelectorError::Empty);
        }

        let engine = Self::create_engine();
        let ast = engine
            .compile(&expression)
            .map_err(|e| SelectorError::Compilation(e.to_string()))?;

        debug!(expression = %expression, "Compiled selector expression");

        let known_selectors = Array::new();
        Ok(Self {
            scope: Self::base_scope(&known_selectors),
            expression,
            ast,
            engine,
            known_selectors,
        })
    }

    /// Creates a Rhai engine with safety limits.
    fn create_engine() -> Engine {
        let mut engine = Engine::new();

        engine.set_max_expr_depths(64, 64);
        engine.set_max_operations(10_000);
        engine.set_max_string_size(64 * 1024);
        engine.set_max_array_size(1_000_000);
        engine.set_max_map_size(10_000);
        engine.set_max_call_levels(16);
        engine.set_optimization_level(rhai::OptimizationLevel::Full);

        register_builtin_functions(&mut engine);
        engine
    }

    fn base_scope(known_selectors: &Array) -> Scope<'static> {
        let mut scope = Scope::new();
        scope.push_constant(SELECTORS_VAR, known_selectors.clone());
        scope
    }

    /// Returns the expression source.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Returns the selectors bound by the last `initialize` call.
    pub fn known_selectors(&self) -> usize {
        self.known_selectors.len()
    }

    /// Binds the database's selectors as the `selectors` constant.
    ///
    /// This never rejects an expression: whether it can produce one of the
    /// known selectors is only decided per message.
    ///
    /// Selectors are bound exactly as given and `in` compares them
    /// case-sensitively. Stages over a case-insensitive database pass them
    /// lowercased, so expressions test `to_lowercase(record.host) in selectors`.
    pub fn initialize(&mut self, known_selectors: &[String]) -> Result<(), SelectorError> {
        self.known_selectors = known_selectors
            .iter()
            .map(|s| Dynamic::from(s.clone()))
            .collect();
        self.scope = Self::base_scope(&self.known_selectors);

        debug!(
            expression = %self.expression,
            known_selectors = self.known_selectors.len(),
            "Initialized template selector"
        );
        Ok(())
    }

    /// Evaluates the expression against a message.
    ///
    /// Returns `None` when the expression yields `()`, an empty string, or
    /// fails to evaluate. Non-string results are converted with their
    /// display form.
    pub fn resolve(&mut self, msg: &LogMessage) -> Option<String> {
        self.evaluate(msg).unwrap_or_else(|e| {
            trace!(expression = %self.expression, error = %e, "Selector expression failed");
            None
        })
    }

    fn evaluate(&mut self, msg: &LogMessage) -> Result<Option<String>, SelectorError> {
        self.scope.rewind(BASE_SCOPE_LEN);
        self.scope.push(RECORD_VAR, message_to_map(msg));

        self.engine
            .eval_ast_with_scope::<Dynamic>(&mut self.scope, &self.ast)
            .map(dynamic_to_selector)
            .map_err(|e| SelectorError::Evaluation(e.to_string()))
    }
}

impl Clone for TemplateSelector {
    fn clone(&self) -> Self {
        Self {
            expression: self.expression.clone(),
            ast: self.ast.clone(),
            engine: Self::create_engine(),
            scope: Self::base_scope(&self.known_selectors),
            known_selectors: self.known_selectors.clone(),
        }
    }
}

fn message_to_map(msg: &LogMessage) -> Map {
    let mut map = Map::new();
    for (name, value) in msg.fields() {
        map.insert(
            name.into(),
            String::from_utf8_lossy(value).into_owned().into(),
        );
    }
    map
}

fn dynamic_to_selector(value: Dynamic) -> Option<String> {
    if value.is_unit() {
        return None;
    }

    let selector = if value.is_string() {
        value.into_string().ok()?
    } else {
        value.to_string()
    };

    (!selector.is_empty()).then_some(selector)
}

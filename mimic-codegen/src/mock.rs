//! Mock type rendering.
//!
//! Every mock delegates to the runtime's generic mock
//! (`GetGenericMockFrom(mock)`), which records invocations and replays stubs
//! in registration order.

use mimic_core::GO_KEYWORDS;
use mimic_model::{InterfaceModel, Method, PRIMITIVE_TYPES, synthesized_param_name};

use crate::builder::CodeBuilder;
use crate::types::{reflect_type_of, render_type};
use crate::ImportSet;

/// Names the generated method bodies declare themselves.
const BODY_LOCALS: &[&str] = &[
    "_params",
    "_result",
    "c",
    "methodInvocations",
    "mock",
    "param",
    "u",
    "verifier",
    "x",
];

/// Package qualifiers used by the generated code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Qualifiers {
    pub runtime: String,
    pub reflect: String,
    pub time: String,
}

impl Qualifiers {
    pub fn from_imports(imports: &ImportSet, runtime_path: &str) -> Self {
        let pick = |path: &str, fallback: &str| {
            imports.qualifier(path).unwrap_or(fallback).to_string()
        };
        Self {
            runtime: pick(runtime_path, "pegomock"),
            reflect: pick("reflect", "reflect"),
            time: pick("time", "time"),
        }
    }
}

/// One method with its parameters ready to print.
struct MethodView<'m> {
    method: &'m Method,
    /// Parameter names, renamed where they would clash with generated code.
    names: Vec<String>,
    /// Rendered parameter types; the element type for a variadic parameter.
    types: Vec<String>,
    results: Vec<String>,
}

impl<'m> MethodView<'m> {
    fn new(method: &'m Method, imports: &ImportSet) -> Self {
        let mut names: Vec<String> = Vec::with_capacity(method.parameters.len());
        for (i, param) in method.parameters.iter().enumerate() {
            if is_safe_param_name(&param.name, imports) && !names.contains(&param.name) {
                names.push(param.name.clone());
                continue;
            }
            // Skip indices already taken, including names kept further on.
            let later = &method.parameters[i + 1..];
            let mut n = i;
            let mut name = synthesized_param_name(n);
            while names.contains(&name) || later.iter().any(|p| p.name == name) {
                n += 1;
                name = synthesized_param_name(n);
            }
            names.push(name);
        }
        Self {
            method,
            names,
            types: method
                .parameters
                .iter()
                .map(|p| render_type(&p.ty, imports))
                .collect(),
            results: method
                .results
                .iter()
                .map(|r| render_type(&r.ty, imports))
                .collect(),
        }
    }

    fn name(&self) -> &str {
        &self.method.name
    }

    fn is_variadic(&self) -> bool {
        self.method.is_variadic()
    }

    /// Number of parameters before the variadic one.
    fn fixed_count(&self) -> usize {
        if self.is_variadic() {
            self.names.len() - 1
        } else {
            self.names.len()
        }
    }

    /// `a string, args ...interface{}`
    fn params_decl(&self) -> String {
        self.names
            .iter()
            .zip(&self.types)
            .enumerate()
            .map(|(i, (name, ty))| {
                if self.is_variadic() && i + 1 == self.names.len() {
                    format!("{} ...{}", name, ty)
                } else {
                    format!("{} {}", name, ty)
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// ` T` or ` (T1, T2)` or nothing.
    fn results_decl(&self) -> String {
        match self.results.as_slice() {
            [] => String::new(),
            [single] => format!(" {}", single),
            many => format!(" ({})", many.join(", ")),
        }
    }

    /// Type of the captured values of parameter `i`: `[]T` for variadic ones.
    fn captured_type(&self, i: usize) -> String {
        if self.is_variadic() && i + 1 == self.names.len() {
            format!("[]{}", self.types[i])
        } else {
            self.types[i].clone()
        }
    }

    /// Collect the call's arguments into `_params`.
    fn push_params(&self, b: &mut CodeBuilder, rt: &str) {
        let fixed = &self.names[..self.fixed_count()];
        b.push_line(&format!("_params := []{}.Param{{{}}}", rt, fixed.join(", ")));
        if self.is_variadic() {
            let variadic = &self.names[self.names.len() - 1];
            b.push_line(&format!("for _, param := range {} {{", variadic));
            b.push_indent();
            b.push_line("_params = append(_params, param)");
            b.push_dedent();
            b.push_line("}");
        }
    }
}

fn is_safe_param_name(name: &str, imports: &ImportSet) -> bool {
    !name.is_empty()
        && name != "_"
        && !name.starts_with("_ret")
        && !BODY_LOCALS.contains(&name)
        && !GO_KEYWORDS.contains(&name)
        && !PRIMITIVE_TYPES.contains(&name)
        && name != "error"
        && !imports.is_alias(name)
}

/// Struct fields, aligned the way gofmt aligns them.
fn push_fields(b: &mut CodeBuilder, fields: &[(&str, String)]) {
    let width = fields.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, ty) in fields {
        b.push_line(&format!("{:width$} {}", name, ty, width = width));
    }
}

/// `key: value,` lines of a composite literal, aligned the way gofmt aligns them.
fn push_keyed(b: &mut CodeBuilder, entries: &[(&str, String)]) {
    let width = entries.iter().map(|(key, _)| key.len() + 1).max().unwrap_or(0);
    for (key, value) in entries {
        b.push_line(&format!("{:width$} {},", format!("{}:", key), value, width = width));
    }
}

/// Renders the mock, verifier and ongoing-verification types of one interface.
pub struct MockRenderer<'a> {
    model: &'a InterfaceModel,
    mock_name: String,
    imports: &'a ImportSet,
    q: &'a Qualifiers,
}

impl<'a> MockRenderer<'a> {
    pub fn new(
        model: &'a InterfaceModel,
        mock_name: impl Into<String>,
        imports: &'a ImportSet,
        qualifiers: &'a Qualifiers,
    ) -> Self {
        Self {
            model,
            mock_name: mock_name.into(),
            imports,
            q: qualifiers,
        }
    }

    pub fn render(&self, b: &mut CodeBuilder) {
        let methods: Vec<MethodView<'_>> = self
            .model
            .methods
            .iter()
            .map(|m| MethodView::new(m, self.imports))
            .collect();

        self.render_mock_type(b);
        for method in &methods {
            b.push_blank();
            self.render_mock_method(b, method);
        }
        b.push_blank();
        self.render_verify_entry_points(b);
        b.push_blank();
        self.render_verifier_type(b);
        for method in &methods {
            b.push_blank();
            self.render_verifier_method(b, method);
            b.push_blank();
            self.render_ongoing_verification(b, method);
        }
    }

    fn verifier_name(&self) -> String {
        format!("Verifier{}", self.mock_name)
    }

    fn ongoing_name(&self, method: &MethodView<'_>) -> String {
        format!("{}_{}_OngoingVerification", self.mock_name, method.name())
    }

    fn render_mock_type(&self, b: &mut CodeBuilder) {
        let mock = &self.mock_name;
        let rt = &self.q.runtime;

        b.push_comment(&format!(
            "{} is a mock implementation of {}.{}.",
            mock, self.model.package_name, self.model.name
        ));
        b.push_line(&format!("type {} struct {{", mock));
        b.push_indent();
        b.push_line("fail func(message string, callerSkip ...int)");
        b.push_dedent();
        b.push_line("}");
        b.push_blank();

        b.push_line(&format!(
            "func New{}(options ...{}.Option) *{} {{",
            mock, rt, mock
        ));
        b.push_indent();
        b.push_line(&format!("mock := &{}{{}}", mock));
        b.push_line("for _, option := range options {");
        b.push_indent();
        b.push_line("option.Apply(mock)");
        b.push_dedent();
        b.push_line("}");
        b.push_line("return mock");
        b.push_dedent();
        b.push_line("}");
        b.push_blank();

        // gofmt aligns the bodies of adjacent one-line functions.
        let setter = format!("func (mock *{}) SetFailHandler(fh {}.FailHandler)", mock, rt);
        let getter = format!("func (mock *{}) FailHandler() {}.FailHandler", mock, rt);
        let width = setter.len().max(getter.len());
        b.push_line(&format!("{:width$} {{ mock.fail = fh }}", setter, width = width));
        b.push_line(&format!("{:width$} {{ return mock.fail }}", getter, width = width));
    }

    fn render_mock_method(&self, b: &mut CodeBuilder, method: &MethodView<'_>) {
        let mock = &self.mock_name;
        let rt = &self.q.runtime;

        b.push_line(&format!(
            "func (mock *{}) {}({}){} {{",
            mock,
            method.name(),
            method.params_decl(),
            method.results_decl()
        ));
        b.push_indent();
        b.push_line("if mock == nil {");
        b.push_indent();
        b.push_line(&format!(
            "panic(\"mock must not be nil. Use myMock := New{}().\")",
            mock
        ));
        b.push_dedent();
        b.push_line("}");
        method.push_params(b, rt);

        let result_types: Vec<String> = method
            .results
            .iter()
            .map(|r| reflect_type_of(&self.q.reflect, r))
            .collect();
        let invoke = format!(
            "{}.GetGenericMockFrom(mock).Invoke(\"{}\", _params, []{}.Type{{{}}})",
            rt,
            method.name(),
            self.q.reflect,
            result_types.join(", ")
        );

        if method.results.is_empty() {
            b.push_line(&invoke);
        } else {
            b.push_line(&format!("_result := {}", invoke));
            for (i, ty) in method.results.iter().enumerate() {
                b.push_line(&format!("var _ret{} {}", i, ty));
            }
            b.push_line("if len(_result) != 0 {");
            b.push_indent();
            for (i, ty) in method.results.iter().enumerate() {
                b.push_line(&format!("if _result[{}] != nil {{", i));
                b.push_indent();
                b.push_line(&format!("_ret{} = _result[{}].({})", i, i, ty));
                b.push_dedent();
                b.push_line("}");
            }
            b.push_dedent();
            b.push_line("}");
            let rets: Vec<String> = (0..method.results.len())
                .map(|i| format!("_ret{}", i))
                .collect();
            b.push_line(&format!("return {}", rets.join(", ")));
        }

        b.push_dedent();
        b.push_line("}");
    }

    fn render_verify_entry_points(&self, b: &mut CodeBuilder) {
        let rt = &self.q.runtime;
        let count = ("invocationCountMatcher", "invocationCountMatcher".to_string());

        self.push_verify_entry(
            b,
            "VerifyWasCalledOnce()",
            vec![("invocationCountMatcher", format!("{}.Times(1)", rt))],
        );
        b.push_blank();
        self.push_verify_entry(
            b,
            &format!(
                "VerifyWasCalled(invocationCountMatcher {}.InvocationCountMatcher)",
                rt
            ),
            vec![count.clone()],
        );
        b.push_blank();
        self.push_verify_entry(
            b,
            &format!(
                "VerifyWasCalledInOrder(invocationCountMatcher {}.InvocationCountMatcher, inOrderContext *{}.InOrderContext)",
                rt, rt
            ),
            vec![
                count.clone(),
                ("inOrderContext", "inOrderContext".to_string()),
            ],
        );
        b.push_blank();
        self.push_verify_entry(
            b,
            &format!(
                "VerifyWasCalledEventually(invocationCountMatcher {}.InvocationCountMatcher, timeout {}.Duration)",
                rt, self.q.time
            ),
            vec![count, ("timeout", "timeout".to_string())],
        );
    }

    fn push_verify_entry(
        &self,
        b: &mut CodeBuilder,
        signature: &str,
        fields: Vec<(&'static str, String)>,
    ) {
        let verifier = self.verifier_name();
        b.push_line(&format!(
            "func (mock *{}) {} *{} {{",
            self.mock_name, signature, verifier
        ));
        b.push_indent();
        b.push_line(&format!("return &{}{{", verifier));
        b.push_indent();
        let mut keyed = vec![("mock", "mock".to_string())];
        keyed.extend(fields);
        push_keyed(b, &keyed);
        b.push_dedent();
        b.push_line("}");
        b.push_dedent();
        b.push_line("}");
    }

    fn render_verifier_type(&self, b: &mut CodeBuilder) {
        let rt = &self.q.runtime;
        b.push_line(&format!("type {} struct {{", self.verifier_name()));
        b.push_indent();
        push_fields(
            b,
            &[
                ("mock", format!("*{}", self.mock_name)),
                ("invocationCountMatcher", format!("{}.InvocationCountMatcher", rt)),
                ("inOrderContext", format!("*{}.InOrderContext", rt)),
                ("timeout", format!("{}.Duration", self.q.time)),
            ],
        );
        b.push_dedent();
        b.push_line("}");
    }

    fn render_verifier_method(&self, b: &mut CodeBuilder, method: &MethodView<'_>) {
        let rt = &self.q.runtime;
        let ongoing = self.ongoing_name(method);

        b.push_line(&format!(
            "func (verifier *{}) {}({}) *{} {{",
            self.verifier_name(),
            method.name(),
            method.params_decl(),
            ongoing
        ));
        b.push_indent();
        method.push_params(b, rt);
        b.push_line(&format!(
            "methodInvocations := {}.GetGenericMockFrom(verifier.mock).Verify(verifier.inOrderContext, verifier.invocationCountMatcher, \"{}\", _params, verifier.timeout)",
            rt,
            method.name()
        ));
        b.push_line(&format!(
            "return &{}{{mock: verifier.mock, methodInvocations: methodInvocations}}",
            ongoing
        ));
        b.push_dedent();
        b.push_line("}");
    }

    fn render_ongoing_verification(&self, b: &mut CodeBuilder, method: &MethodView<'_>) {
        let rt = &self.q.runtime;
        let ongoing = self.ongoing_name(method);

        b.push_line(&format!("type {} struct {{", ongoing));
        b.push_indent();
        push_fields(
            b,
            &[
                ("mock", format!("*{}", self.mock_name)),
                ("methodInvocations", format!("[]{}.MethodInvocation", rt)),
            ],
        );
        b.push_dedent();
        b.push_line("}");

        if method.names.is_empty() {
            return;
        }

        // GetCapturedArguments: the arguments of the last invocation.
        let captured: Vec<String> = (0..method.names.len())
            .map(|i| method.captured_type(i))
            .collect();
        let returns = if captured.len() == 1 {
            captured[0].clone()
        } else {
            format!("({})", captured.join(", "))
        };
        b.push_blank();
        b.push_line(&format!(
            "func (c *{}) GetCapturedArguments() {} {{",
            ongoing, returns
        ));
        b.push_indent();
        b.push_line(&format!(
            "{} := c.GetAllCapturedArguments()",
            method.names.join(", ")
        ));
        let lasts: Vec<String> = method
            .names
            .iter()
            .map(|n| format!("{}[len({})-1]", n, n))
            .collect();
        b.push_line(&format!("return {}", lasts.join(", ")));
        b.push_dedent();
        b.push_line("}");

        // GetAllCapturedArguments: one slice entry per invocation.
        let named_results: Vec<String> = method
            .names
            .iter()
            .enumerate()
            .map(|(i, n)| format!("{} []{}", n, method.captured_type(i)))
            .collect();
        b.push_blank();
        b.push_line(&format!(
            "func (c *{}) GetAllCapturedArguments() ({}) {{",
            ongoing,
            named_results.join(", ")
        ));
        b.push_indent();
        b.push_line(&format!(
            "_params := {}.GetGenericMockFrom(c.mock).GetInvocationParams(c.methodInvocations)",
            rt
        ));
        b.push_line("if len(_params) > 0 {");
        b.push_indent();

        let fixed = method.fixed_count();
        for i in 0..fixed {
            let name = &method.names[i];
            let ty = &method.types[i];
            b.push_line(&format!(
                "{} = make([]{}, len(c.methodInvocations))",
                name, ty
            ));
            b.push_line(&format!("for u, param := range _params[{}] {{", i));
            b.push_indent();
            b.push_line("if param != nil {");
            b.push_indent();
            b.push_line(&format!("{}[u] = param.({})", name, ty));
            b.push_dedent();
            b.push_line("}");
            b.push_dedent();
            b.push_line("}");
        }

        if method.is_variadic() {
            let name = &method.names[fixed];
            let ty = &method.types[fixed];
            b.push_line(&format!(
                "{} = make([][]{}, len(c.methodInvocations))",
                name, ty
            ));
            b.push_line("for u := range c.methodInvocations {");
            b.push_indent();
            let (count, index) = if fixed == 0 {
                ("len(_params)".to_string(), "x".to_string())
            } else {
                (format!("len(_params)-{}", fixed), format!("x-{}", fixed))
            };
            b.push_line(&format!("{}[u] = make([]{}, {})", name, ty, count));
            b.push_line(&format!("for x := {}; x < len(_params); x++ {{", fixed));
            b.push_indent();
            b.push_line("if _params[x][u] != nil {");
            b.push_indent();
            b.push_line(&format!("{}[u][{}] = _params[x][u].({})", name, index, ty));
            b.push_dedent();
            b.push_line("}");
            b.push_dedent();
            b.push_line("}");
            b.push_dedent();
            b.push_line("}");
        }

        b.push_dedent();
        b.push_line("}");
        b.push_line("return");
        b.push_dedent();
        b.push_line("}");
    }
}

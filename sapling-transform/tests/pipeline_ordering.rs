//! Ordering guarantees of the pass pipeline executor.

use std::sync::{Arc, Mutex};

use sapling_ast::NodeKind;
use sapling_transform::{
    ErrorCode, File, HookAction, Options, Pass, PassContext, PassGroup, ResolvedConfig,
    Transformer,
};
use sapling_traverse::Visitor;

type Log = Arc<Mutex<Vec<String>>>;

/// A pass that records its pre/post hook invocations and optionally its
/// identifier-handler invocations into a shared log.
struct MarkerPass {
    key: String,
    log: Log,
    log_idents: bool,
}

impl MarkerPass {
    fn new(key: &str, log: &Log) -> Self {
        Self {
            key: key.to_string(),
            log: log.clone(),
            log_idents: false,
        }
    }

    fn with_ident_handler(key: &str, log: &Log) -> Self {
        Self {
            key: key.to_string(),
            log: log.clone(),
            log_idents: true,
        }
    }
}

impl Pass for MarkerPass {
    fn key(&self) -> &str {
        &self.key
    }

    fn visitor(&self) -> Visitor<PassContext> {
        if !self.log_idents {
            return Visitor::new();
        }
        let log = self.log.clone();
        let key = self.key.clone();
        Visitor::new().on(NodeKind::Ident, move |_cx: &mut PassContext, _, _| {
            log.lock().unwrap().push(format!("{key}:ident"));
            Ok(())
        })
    }

    fn pre(&self, _cx: &mut PassContext, _file: &mut File) -> HookAction {
        self.log.lock().unwrap().push(self.key.clone());
        HookAction::done()
    }

    fn post(&self, _cx: &mut PassContext, _file: &mut File) -> HookAction {
        self.log.lock().unwrap().push(format!("{}:post", self.key));
        HookAction::done()
    }
}

fn run(groups: Vec<PassGroup>, source: &str) -> Result<(), sapling_transform::TransformError> {
    let config = ResolvedConfig::new(
        Options {
            filename: "ordering.sl".to_string(),
            ..Options::default()
        },
        groups,
    );
    Transformer::new().transform(&config, source, None).map(|_| ())
}

#[test]
fn test_hooks_run_in_descriptor_order() {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let group = PassGroup::new(vec![
        Arc::new(MarkerPass::new("A", &log)),
        Arc::new(MarkerPass::new("B", &log)),
        Arc::new(MarkerPass::new("C", &log)),
    ]);
    run(vec![group], "let x = 1;").unwrap();

    let entries = log.lock().unwrap().clone();
    assert_eq!(entries[..3], ["A", "B", "C"]);
    assert_eq!(entries[3..], ["A:post", "B:post", "C:post"]);
}

#[test]
fn test_shared_node_kind_handlers_fire_in_descriptor_order() {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let group = PassGroup::new(vec![
        Arc::new(MarkerPass::with_ident_handler("first", &log)),
        Arc::new(MarkerPass::with_ident_handler("second", &log)),
    ]);
    run(vec![group], "x;").unwrap();

    let entries: Vec<String> = log
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.ends_with(":ident"))
        .cloned()
        .collect();
    assert_eq!(entries, ["first:ident", "second:ident"]);
}

#[test]
fn test_groups_are_fully_sequential() {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let first = PassGroup::new(vec![Arc::new(MarkerPass::new("g1", &log))]);
    let second = PassGroup::new(vec![Arc::new(MarkerPass::new("g2", &log))]);
    run(vec![first, second], "let x = 1;").unwrap();

    let entries = log.lock().unwrap().clone();
    assert_eq!(entries, ["g1", "g1:post", "g2", "g2:post"]);
}

#[test]
fn test_empty_group_still_runs_hoisting() {
    let config = ResolvedConfig::new(
        Options {
            filename: "hoist.sl".to_string(),
            ..Options::default()
        },
        vec![PassGroup::default()],
    );
    let output = Transformer::new()
        .transform(&config, "let a = 1;\nimport { b } from \"m\";", None)
        .unwrap();
    let code = output.code.unwrap();
    assert_eq!(code, "import { b } from \"m\";\nlet a = 1;\n");
}

#[test]
fn test_deferred_pre_hook_fails_before_traversal() {
    struct DeferredPass;
    impl Pass for DeferredPass {
        fn key(&self) -> &str {
            "deferred"
        }
        fn visitor(&self) -> Visitor<PassContext> {
            Visitor::new()
        }
        fn pre(&self, _cx: &mut PassContext, _file: &mut File) -> HookAction {
            HookAction::Deferred
        }
    }

    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let group = PassGroup::new(vec![
        Arc::new(DeferredPass),
        Arc::new(MarkerPass::with_ident_handler("observer", &log)),
    ]);
    let config = ResolvedConfig::new(
        Options {
            filename: "deferred.sl".to_string(),
            ..Options::default()
        },
        vec![group],
    );
    let err = Transformer::new()
        .transform(&config, "x;", None)
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::AsyncHookUnsupported);
    assert_eq!(err.code().as_str(), "ASYNC_HOOK_UNSUPPORTED");
    assert!(err.to_string().starts_with("deferred.sl:"));
    assert!(err.to_string().contains("pre hook"));
    // Traversal never started: no handler fired for the observer pass.
    assert!(log.lock().unwrap().iter().all(|e| !e.ends_with(":ident")));
}

#[test]
fn test_handler_error_is_classified_as_transform() {
    struct FailingPass;
    impl Pass for FailingPass {
        fn key(&self) -> &str {
            "failing"
        }
        fn visitor(&self) -> Visitor<PassContext> {
            Visitor::new().on(NodeKind::Ident, |_cx: &mut PassContext, _, _| {
                Err(eyre::eyre!("handler exploded"))
            })
        }
    }

    let config = ResolvedConfig::new(
        Options {
            filename: "failing.sl".to_string(),
            ..Options::default()
        },
        vec![PassGroup::new(vec![Arc::new(FailingPass)])],
    );
    let err = Transformer::new()
        .transform(&config, "x;", None)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Transform);
    assert!(err.to_string().starts_with("failing.sl:"));
    assert!(err.to_string().contains("handler exploded"));
    // With visitor wrapping on (the default), the failing pass is named.
    assert!(err.to_string().contains("failing"));
}

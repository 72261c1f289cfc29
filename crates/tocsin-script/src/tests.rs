use crate::{ScriptError, ScriptPool, ScriptRef, Vm};
use serde::Serialize;
use serde_json::json;
use std::io::Write;

fn test_vm() -> Vm {
    Vm::new(0, None).expect("fresh vm")
}

#[test]
fn extracts_tables_as_sequences_and_mappings() {
    let mut vm = test_vm();
    let ret = vm
        .eval(
            &json!({}),
            &ScriptRef::inline(
                r#"
                return {
                    a = 1,
                    b = 1.1,
                    c = "foo",
                    d = { e = "baz" },
                    f = { "buz", 5 },
                    g = {},
                }
                "#,
            ),
        )
        .unwrap();

    assert_eq!(
        ret,
        json!({
            "a": 1,
            "b": 1.1,
            "c": "foo",
            "d": {"e": "baz"},
            "f": ["buz", 5],
            "g": [],
        })
    );
}

#[test]
fn extracts_sparse_sequence_with_null_holes() {
    let mut vm = test_vm();
    let ret = vm
        .eval(&json!({}), &ScriptRef::inline(r#"return {[1] = "a", [3] = "c"}"#))
        .unwrap();
    assert_eq!(ret, json!(["a", null, "c"]));
}

#[test]
fn mixed_keys_extract_as_mapping() {
    let mut vm = test_vm();
    let ret = vm
        .eval(&json!({}), &ScriptRef::inline(r#"return {[1] = "a", x = "b"}"#))
        .unwrap();
    assert_eq!(ret, json!({"1": "a", "x": "b"}));
}

#[test]
fn integral_floats_extract_as_integers() {
    let mut vm = test_vm();
    let ret = vm
        .eval(&json!({}), &ScriptRef::inline("return 4 / 2"))
        .unwrap();
    assert_eq!(ret, json!(2));
}

#[test]
fn marshalling_honors_serde_shape() {
    #[derive(Serialize)]
    struct Foo {
        #[serde(rename = "A")]
        a: i64,
        #[serde(rename = "B")]
        b: &'static str,
    }

    #[derive(Serialize)]
    struct Bar {
        #[serde(rename = "C")]
        c: Foo,
        d: bool,
    }

    #[derive(Serialize)]
    struct Baz {
        #[serde(flatten)]
        bar: Bar,
        #[serde(rename = "E")]
        e: &'static str,
        #[serde(skip)]
        #[allow(dead_code)]
        f: i64,
    }

    let ctx = serde_json::to_value(Baz {
        bar: Bar {
            c: Foo { a: 1, b: "wat" },
            d: true,
        },
        e: "wut",
        f: 5,
    })
    .unwrap();

    let mut vm = test_vm();
    let ret = vm
        .eval(
            &ctx,
            &ScriptRef::inline(
                r#"
                if ctx.C.A ~= 1 then return false end
                if ctx.C.B ~= "wat" then return false end
                if ctx.d ~= true then return false end
                if ctx.E ~= "wut" then return false end
                if ctx.F ~= nil then return false end
                return true
                "#,
            ),
        )
        .unwrap();
    assert_eq!(ret, json!(true));
}

#[test]
fn sequences_marshal_one_based() {
    let mut vm = test_vm();
    let ctx = json!({"xs": ["foo", true, 4, ["bar", "baz"]]});
    let ret = vm
        .eval(
            &ctx,
            &ScriptRef::inline(
                r#"
                if ctx.xs[1] ~= "foo" then return false end
                if ctx.xs[2] ~= true then return false end
                if ctx.xs[3] ~= 4 then return false end
                if ctx.xs[4][1] ~= "bar" then return false end
                if ctx.xs[4][2] ~= "baz" then return false end
                return true
                "#,
            ),
        )
        .unwrap();
    assert_eq!(ret, json!(true));
}

#[test]
fn chunks_compile_once_per_vm() {
    let mut vm = test_vm();
    let source = ScriptRef::inline(r#"return ctx.name"#);

    let first = vm.eval(&json!({"name": "foo"}), &source).unwrap();
    let second = vm.eval(&json!({"name": "bar"}), &source).unwrap();
    assert_eq!(first, json!("foo"));
    assert_eq!(second, json!("bar"));
    assert_eq!(vm.loads(), 1);

    vm.eval(&json!({}), &ScriptRef::inline("return 1")).unwrap();
    assert_eq!(vm.loads(), 2);
}

#[test]
fn file_scripts_load_and_cache_by_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"return ctx.name == "foo""#).unwrap();
    let source = ScriptRef::file(file.path());

    let mut vm = test_vm();
    let ret = vm.eval(&json!({"name": "foo"}), &source).unwrap();
    assert_eq!(ret, json!(true));
    let ret = vm.eval(&json!({"name": "bar"}), &source).unwrap();
    assert_eq!(ret, json!(false));
    assert_eq!(vm.loads(), 1);
}

#[test]
fn empty_source_is_an_error() {
    let mut vm = test_vm();
    let err = vm.eval(&json!({}), &ScriptRef::default()).unwrap_err();
    assert!(matches!(err, ScriptError::NoSource));
}

#[test]
fn ambiguous_source_fails_validation() {
    let source = ScriptRef {
        lua_file: Some("cond.lua".into()),
        lua_inline: Some("return true".into()),
    };
    assert!(matches!(
        source.validate(),
        Err(ScriptError::AmbiguousSource)
    ));
    assert!(ScriptRef::default().validate().is_ok());
    assert!(ScriptRef::default().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn pool_round_trips_through_a_worker() {
    let pool = ScriptPool::spawn(2, None).unwrap();
    let ret = pool
        .eval(json!({"name": "foo"}), &ScriptRef::inline("return ctx.name"))
        .await
        .unwrap();
    assert_eq!(ret, json!("foo"));
}

#[tokio::test(flavor = "multi_thread")]
async fn pool_reports_broken_scripts_as_failed() {
    let pool = ScriptPool::spawn(1, None).unwrap();
    let err = pool
        .eval(json!({}), &ScriptRef::inline("this is not lua"))
        .await
        .unwrap_err();
    assert!(matches!(err, ScriptError::Failed));

    // the vm survives a bad chunk
    let ret = pool
        .eval(json!({}), &ScriptRef::inline("return 2"))
        .await
        .unwrap();
    assert_eq!(ret, json!(2));
}

#[tokio::test(flavor = "multi_thread")]
async fn init_script_runs_before_commands() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "greeting = \"ohai\"").unwrap();

    let pool = ScriptPool::spawn(1, Some(file.path().to_path_buf())).unwrap();
    let ret = pool
        .eval(json!({}), &ScriptRef::inline("return greeting"))
        .await
        .unwrap();
    assert_eq!(ret, json!("ohai"));
}

#[test]
fn failing_init_script_aborts_spawn() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "error(\"broken init\")").unwrap();
    assert!(ScriptPool::spawn(2, Some(file.path().to_path_buf())).is_err());
}

//! jq pre-filter for input documents, backed by `jaq`.
use anyhow::{anyhow, Context, Result};
use jaq_core::{compile::Undefined, load, Compiler, Ctx, RcIter};
use jaq_json::Val;
use serde_json::Value;

/// Run `filter_src` over one document; every output becomes its own document.
pub fn run_jaq(filter_src: &str, input: &Value) -> Result<Vec<Value>> {
    let loader = load::Loader::new(jaq_std::defs().chain(jaq_json::defs()));
    let arena = load::Arena::default();
    let program = load::File { code: filter_src, path: () };

    let modules = loader
        .load(&arena, program)
        .map_err(describe_parse_errors)?;

    let filter = Compiler::default()
        .with_funs(jaq_std::funs().chain(jaq_json::funs()))
        .compile(modules)
        .map_err(describe_undefined)?;

    let inputs = RcIter::new(core::iter::empty());
    let outputs = filter.run((Ctx::new([], &inputs), Val::from(input.clone())));

    let mut docs = Vec::new();
    for (index, item) in outputs.enumerate() {
        let val = item.map_err(|e| anyhow!("{e:?}"))?;
        // Val renders as JSON text
        let doc = serde_json::from_str::<Value>(&val.to_string())
            .with_context(|| format!("jq output #{index} is not valid JSON"))?;
        docs.push(doc);
    }
    Ok(docs)
}

fn describe_parse_errors(
    errs: Vec<(load::File<&str, ()>, load::Error<&str>)>,
) -> anyhow::Error {
    let lines: Vec<String> = errs
        .into_iter()
        .map(|(file, err)| format!("parse error: {err:?} in `{}`", file.code))
        .collect();
    anyhow!(lines.join("\n"))
}

fn describe_undefined(
    errs: Vec<(load::File<&str, ()>, Vec<(&str, Undefined)>)>,
) -> anyhow::Error {
    let mut lines = Vec::new();
    for (file, list) in errs {
        for (name, undef) in list {
            lines.push(format!("undefined `{name}`: {undef:?} in `{}`", file.code));
        }
    }
    anyhow!(lines.join("\n"))
}

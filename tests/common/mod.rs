use lumen_lang::Lumen;

/// Runs a source string through the full pipeline and returns whatever it
/// wrote to its `print` sink. Panics if scanning, parsing or resolving
/// failed, so callers only reach for this when they expect success.
#[allow(dead_code)]
pub fn run_ok(source: &str) -> String {
    let mut output: Vec<u8> = vec![];
    let mut lumen = Lumen::new(&mut output);
    lumen.run_line(source.to_string());
    assert!(!lumen.had_error(), "expected {source:?} to run without error");
    drop(lumen);
    String::from_utf8(output).expect("print output is valid utf-8")
}

/// Runs a source string and reports whether it failed before or during
/// execution, without asserting either way.
#[allow(dead_code)]
pub fn run(source: &str) -> (String, bool, bool) {
    let mut output: Vec<u8> = vec![];
    let mut lumen = Lumen::new(&mut output);
    lumen.run_line(source.to_string());
    let had_error = lumen.had_error();
    let had_runtime_error = lumen.had_runtime_error();
    drop(lumen);
    (String::from_utf8(output).expect("print output is valid utf-8"), had_error, had_runtime_error)
}

#![allow(dead_code)]

use std::io::Write;

use tempfile::NamedTempFile;

/// Wraps the input the way MathJax does, and annotates `\bad`.
pub const ECHO: &str = r#"
export default function (tex, display) {
  if (tex === '\\bad') {
    return '<mjx-container><svg><g data-mml-node="merror" data-mjx-error="Undefined control sequence \\bad"></g></svg></mjx-container>';
  }
  return '<mjx-container display="' + display + '"><svg data-display="' + display + '"><text>' + tex + '</text></svg></mjx-container>';
}
"#;

pub const THROWS: &str = r#"
export default function () {
  throw new Error('engine exploded');
}
"#;

pub const THROWS_STRING: &str = r#"
export default function () {
  throw 'plain string';
}
"#;

pub const NO_DEFAULT: &str = "export const answer = 42;\n";

pub const SYNTAX_ERROR: &str = "export default function (\n";

pub const FAILS_TO_LOAD: &str = "throw new Error('bad bundle');\n";

/// Write `source` to a temporary bundle file that lives as long as the handle.
pub fn bundle(source: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(source.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

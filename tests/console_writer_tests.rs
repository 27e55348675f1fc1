use std::io::Write;

use consolefmt::{ConsoleWriter, WriterConfig};
use serde_json::json;

fn plain_config() -> WriterConfig {
    WriterConfig {
        use_colors: Some(false),
        ..WriterConfig::default()
    }
}

fn colored_config() -> WriterConfig {
    WriterConfig {
        use_colors: Some(true),
        ..WriterConfig::default()
    }
}

fn render(config: WriterConfig, input: &str) -> String {
    let mut writer = ConsoleWriter::with_config(Vec::new(), config);
    writer.write(input.as_bytes()).unwrap();
    String::from_utf8(writer.into_inner()).unwrap()
}

#[test]
fn test_default_configuration_renders_expected_line() {
    let input = r#"{"time" : "1970-01-01T00:00:00Z", "level" : "info", "message" : "Foobar"}"#;
    assert_eq!(render(plain_config(), input), "12:00AM INF Foobar\n");
}

#[test]
fn test_colored_output_wraps_level_in_sgr() {
    let input = r#"{"time":"1970-01-01T00:00:00Z","level":"info","message":"Foobar"}"#;
    let output = render(colored_config(), input);
    assert!(output.contains("\x1b[2m12:00AM\x1b[0m"));
    assert!(output.contains("\x1b[32mINF\x1b[0m"));
    assert!(output.contains("Foobar"));
    assert!(output.ends_with('\n'));
}

#[test]
fn test_custom_time_formatter_applies_to_rendered_line() {
    let mut writer = ConsoleWriter::with_config(Vec::new(), plain_config());
    writer.set_formatter("time", Box::new(|_| "FOOBAR".to_string()));
    writer
        .write(br#"{"time":"1970-01-01T00:00:00Z","level":"info","message":"m"}"#)
        .unwrap();
    let output = String::from_utf8(writer.into_inner()).unwrap();
    assert_eq!(output, "FOOBAR INF m\n");
}

#[test]
fn test_error_field_leads_arbitrary_fields() {
    let input = r#"{"level":"info","message":"m","b":"2","a":"1","error":"boom"}"#;
    assert_eq!(render(plain_config(), input), "INF m error=boom a=1 b=2\n");
}

#[test]
fn test_error_field_is_emphasized_in_color_mode() {
    let input = r#"{"message":"m","error":"boom"}"#;
    let output = render(colored_config(), input);
    assert!(output.contains("\x1b[2m\x1b[31merror=\x1b[0m"));
    assert!(output.contains("\x1b[1;31mboom\x1b[0m"));
}

#[test]
fn test_malformed_input_writes_nothing() {
    let mut writer = ConsoleWriter::with_config(Vec::new(), plain_config());
    assert!(writer.write(b"{ not json }").is_err());
    assert!(writer.write(b"\"a string\"").is_err());
    assert!(writer.write(b"").is_err());
    assert!(writer.into_inner().is_empty());
}

#[test]
fn test_every_valid_record_ends_in_one_newline() {
    let inputs = [
        r#"{}"#,
        r#"{"message":"hello"}"#,
        r#"{"level":"warn","message":"careful","count":3}"#,
        r#"{"a":null,"b":[1,2],"c":{"d":true}}"#,
    ];
    for input in inputs {
        let output = render(plain_config(), input);
        assert!(output.ends_with('\n'), "missing newline for {}", input);
        assert_eq!(output.matches('\n').count(), 1, "extra newline for {}", input);
    }
}

#[test]
fn test_large_integers_keep_full_precision() {
    let input = r#"{"message":"m","id":9007199254740993,"elapsed_ns":18446744073709551615}"#;
    let output = render(plain_config(), input);
    assert!(output.contains("id=9007199254740993"));
    assert!(output.contains("elapsed_ns=18446744073709551615"));
}

#[test]
fn test_formatter_lookup_never_fails() {
    let writer = ConsoleWriter::with_config(Vec::new(), plain_config());
    let f = writer.formatter("no_such_formatter");
    assert_eq!(f(Some(&json!("value"))), "value");
    assert_eq!(f(Some(&json!(42))), "42");
    assert_eq!(f(None), "");
}

#[test]
fn test_successive_writes_are_independent_lines() {
    let mut writer = ConsoleWriter::with_config(Vec::new(), plain_config());
    writer.write(br#"{"level":"info","message":"one"}"#).unwrap();
    writer.write(br#"{"level":"warn","message":"two"}"#).unwrap();
    let output = String::from_utf8(writer.into_inner()).unwrap();
    assert_eq!(output, "INF one\nWRN two\n");
}

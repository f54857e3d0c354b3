//! JSON I/O handling for the CLI
//!
//! - Input: one JSON object on stdin
//! - Output: one JSON object per line on stdout
//! - Logs never go to stdout

use std::io::{self, Read, Write};

use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Parse one JSON request object
pub fn parse_request(input: &str) -> CliResult<Value> {
    if input.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }
    let value: Value = serde_json::from_str(input)?;
    if !value.is_object() {
        return Err(CliError::io_error("Request must be a JSON object"));
    }
    Ok(value)
}

/// Read a JSON request from stdin
pub fn read_request() -> CliResult<Value> {
    let mut input = String::new();
    io::stdin().lock().read_to_string(&mut input)?;
    parse_request(&input)
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });
    write_json(&response.to_string())
}

/// Write a raw JSON string (or any text) to stdout
pub fn write_json(json_str: &str) -> CliResult<()> {
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", json_str)?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request() {
        let v = parse_request("{\"doc_id\":\"ds01\",\n \"question\":\"what is pin 5\"}").unwrap();
        assert_eq!(v["doc_id"], "ds01");
    }

    #[test]
    fn test_parse_request_rejects_empty_and_non_objects() {
        assert_eq!(parse_request("  \n").unwrap_err().code_str(), "AKILI_CLI_IO_ERROR");
        assert!(parse_request("[1,2]").is_err());
        assert!(parse_request("{oops").is_err());
    }
}

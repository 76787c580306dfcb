use crate::eval::Failure;

/// One line of output for an evaluated program.
pub fn render(result: &Result<i64, Failure>) -> String {
    match result {
        Ok(n) => n.to_string(),
        Err(failure) => format!("error: {failure}"),
    }
}

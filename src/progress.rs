use std::io::{self, Write};

/// Run `op` bracketed by coarse progress markers: `"{label}... "` before,
/// `"Done!"` after a normal return. Failures propagate without the
/// completion marker.
pub fn phase<T, E>(label: &str, op: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
    print!("{label}... ");
    let _ = io::stdout().flush();
    let value = op()?;
    println!("Done!");
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_the_operation_value() {
        let value: Result<i32, ()> = phase("Counting", || Ok(42));
        assert_eq!(value, Ok(42));
    }

    #[test]
    fn propagates_errors() {
        let value: Result<(), &str> = phase("Failing", || Err("boom"));
        assert_eq!(value, Err("boom"));
    }
}

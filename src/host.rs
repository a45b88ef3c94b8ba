//! Hostname lookup for the report's `host` field.

/// Returns the local machine name, or an empty string if it cannot be found.
///
/// Windows reads `COMPUTERNAME`. Unix asks `gethostname(2)` and falls back to
/// the `HOSTNAME` environment variable.
#[must_use]
pub fn resolve_hostname() -> String {
    platform_hostname()
        .map(|name| name.trim().to_string())
        .unwrap_or_default()
}

#[cfg(windows)]
fn platform_hostname() -> Option<String> {
    non_empty(std::env::var("COMPUTERNAME").ok())
}

#[cfg(unix)]
fn platform_hostname() -> Option<String> {
    non_empty(system_hostname()).or_else(|| non_empty(std::env::var("HOSTNAME").ok()))
}

#[cfg(not(any(windows, unix)))]
fn platform_hostname() -> Option<String> {
    None
}

#[cfg(unix)]
fn system_hostname() -> Option<String> {
    let mut buf = [0u8; 256];
    // SAFETY: buf is valid for writes of buf.len() bytes.
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr().cast(), buf.len()) };
    if rc != 0 {
        return None;
    }
    // Truncated names may lack the terminator.
    let len = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    Some(String::from_utf8_lossy(&buf[..len]).into_owned())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hostname_has_no_surrounding_whitespace() {
        let name = resolve_hostname();
        assert_eq!(name, name.trim());
    }

    #[test]
    fn non_empty_rejects_blank_values() {
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(Some("box".to_string())), Some("box".to_string()));
    }

    #[cfg(unix)]
    #[test]
    fn system_hostname_has_no_nul() {
        if let Some(name) = system_hostname() {
            assert!(!name.contains('\0'));
        }
    }
}

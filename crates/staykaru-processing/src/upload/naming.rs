use rand::Rng;

use crate::compression::OutputFormat;

/// Unique stored filename: `image-<unix millis>-<9 random digits>.<ext>`.
pub fn generate_filename(format: OutputFormat) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rand::rng().random_range(0..1_000_000_000);
    format!("image-{}-{:09}.{}", millis, suffix, format.extension())
}

/// Make a client filename safe to echo back and log.
pub fn sanitize_filename(filename: &str) -> String {
    const MAX: usize = 255;
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);
    if base.contains("..") {
        return "invalid_filename".to_string();
    }
    let s: String = base
        .chars()
        .take(MAX)
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if s.trim_matches('_').is_empty() {
        "file".to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_filename_shape() {
        let name = generate_filename(OutputFormat::Jpeg);
        assert!(name.starts_with("image-"));
        assert!(name.ends_with(".jpg"));
        let parts: Vec<&str> = name.trim_end_matches(".jpg").split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[2].len(), 9);
        assert!(parts[1].parse::<i64>().is_ok());
    }

    #[test]
    fn test_generated_filenames_do_not_collide() {
        let names: HashSet<String> = (0..1000)
            .map(|_| generate_filename(OutputFormat::WebP))
            .collect();
        assert_eq!(names.len(), 1000);
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("room photo.jpg"), "room_photo.jpg");
        assert_eq!(sanitize_filename("C:\\Users\\me\\pic.png"), "pic.png");
        assert_eq!(sanitize_filename("/etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("..jpg"), "invalid_filename");
        assert_eq!(sanitize_filename(""), "file");
    }
}

/// `<slug(name)>-<epoch_ms>.<ext>`; an empty slug becomes `badge`.
pub fn suggested_filename_at(name: &str, extension: &str, epoch_ms: i64) -> String {
    let slug = slug::slugify(name);
    let slug = if slug.is_empty() { "badge" } else { slug.as_str() };
    format!("{slug}-{epoch_ms}.{extension}")
}

/// [`suggested_filename_at`] stamped with the current time.
pub fn suggested_filename(name: &str, extension: &str) -> String {
    suggested_filename_at(name, extension, chrono::Utc::now().timestamp_millis())
}

#[cfg(test)]
#[path = "../../tests/unit/export/naming.rs"]
mod tests;

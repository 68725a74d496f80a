use crate::error::ValidationError;

/// Directory holding app submissions, relative to the repository root.
pub const APPS_PREFIX: &str = "apps/";

/// The one app id a pull request's changed files belong to.
///
/// # Errors
///
/// Returns [`ValidationError::ScopeViolation`] if any path lies outside
/// `apps/`, or if the paths span zero or several app directories.
pub fn submitted_app(changed: &[String]) -> Result<String, ValidationError> {
    let mut apps: Vec<&str> = Vec::new();
    for path in changed {
        let Some(rest) = path.strip_prefix(APPS_PREFIX) else {
            return Err(ValidationError::ScopeViolation(
                "please do not modify other files while submitting an app".into(),
            ));
        };
        let app = rest.split('/').next().unwrap_or_default();
        if !apps.contains(&app) {
            apps.push(app);
        }
    }

    match apps.as_slice() {
        [app] => Ok((*app).to_string()),
        _ => Err(ValidationError::ScopeViolation(
            "please submit only one app at a time".into(),
        )),
    }
}

//! Application being bundled.

/// Describes the third-party application that gets packaged.
///
/// Defaults describe the AWS CLI v2 source release.
#[derive(Clone, Debug)]
pub struct AppSettings {
    /// Name of the environment root under `share/` (e.g. "awscli").
    pub app_id: String,

    /// Installer-generated entrypoints to rewrite into `bin/` (e.g. "aws").
    pub programs: Vec<String>,

    /// Source archive URL, `{version}` is substituted.
    pub source_url_template: String,

    /// Archive file name inside the workspace, `{version}` is substituted.
    pub archive_name_template: String,

    /// User-Agent header sent with the download.
    pub user_agent: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            app_id: "awscli".into(),
            programs: vec!["aws".into()],
            source_url_template: "https://github.com/aws/aws-cli/archive/{version}.tar.gz".into(),
            archive_name_template: "aws-cli-{version}.tar.gz".into(),
            user_agent: "pkgx/manifests".into(),
        }
    }
}

impl AppSettings {
    /// Source archive URL for `version`.
    pub fn source_url(&self, version: &str) -> String {
        self.source_url_template.replace("{version}", version)
    }

    /// Archive file name for `version`.
    pub fn archive_name(&self, version: &str) -> String {
        self.archive_name_template.replace("{version}", version)
    }
}

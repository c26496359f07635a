use serde::{Deserialize, Serialize};

use crate::output::FilenameTemplate;
use crate::types::Target;

/// One module transform rule: files matching `test` go through `loader`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRule {
    pub test: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,

    pub loader: Loader,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Loader {
    /// TypeScript/TSX transpilation
    TypeScript {
        /// Skip type errors here; the type-check plugin reports them
        transpile_only: bool,
        config_file: String,
    },
    /// Stylesheets
    Css {
        modules: bool,
        /// Server bundles only need the class-name mapping
        export_only_locals: bool,
    },
    /// Images and fonts copied next to the bundle
    Asset {
        filename: FilenameTemplate,
        emit: bool,
    },
}

pub(crate) fn module_rules(
    target: Target,
    tsconfig: &str,
    asset_filename: &FilenameTemplate,
) -> Vec<ModuleRule> {
    let server = target.is_server();
    vec![
        ModuleRule {
            test: r"\.tsx?$".to_string(),
            exclude: Some(r"[\\/]node_modules[\\/]".to_string()),
            loader: Loader::TypeScript {
                transpile_only: true,
                config_file: tsconfig.to_string(),
            },
        },
        ModuleRule {
            test: r"\.css$".to_string(),
            exclude: None,
            loader: Loader::Css {
                modules: true,
                export_only_locals: server,
            },
        },
        ModuleRule {
            test: r"\.(png|jpe?g|gif|svg|woff2?|ttf|eot)$".to_string(),
            exclude: None,
            loader: Loader::Asset {
                filename: asset_filename.clone(),
                // Both builds must agree on URLs, but only the client writes files.
                emit: !server,
            },
        },
    ]
}

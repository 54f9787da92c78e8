//! Language classification
//!
//! Maps file names and extensions to editor-style language identifiers.
//! Identifiers are only used to group telemetry, so unknown files fall
//! back to `plaintext` rather than failing.

use std::path::Path;

/// Identifier used when nothing matches
pub const PLAINTEXT: &str = "plaintext";

/// Classify a file by its well-known name
fn language_for_file_name(name: &str) -> Option<&'static str> {
    let id = match name {
        "Dockerfile" | "Containerfile" => "dockerfile",
        "Makefile" | "GNUmakefile" | "makefile" => "makefile",
        "CMakeLists.txt" => "cmake",
        "Gemfile" | "Rakefile" => "ruby",
        "Jenkinsfile" => "groovy",
        ".gitignore" | ".dockerignore" => "ignore",
        _ => return None,
    };
    Some(id)
}

/// Classify a file by its extension (without the dot, any case)
pub fn language_for_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "rs" => "rust",
        "ts" | "mts" | "cts" => "typescript",
        "tsx" => "typescriptreact",
        "js" | "mjs" | "cjs" => "javascript",
        "jsx" => "javascriptreact",
        "py" | "pyi" => "python",
        "go" => "go",
        "java" => "java",
        "kt" | "kts" => "kotlin",
        "scala" => "scala",
        "cs" => "csharp",
        "fs" | "fsx" => "fsharp",
        "c" | "h" => "c",
        "cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" => "cpp",
        "m" => "objective-c",
        "swift" => "swift",
        "rb" => "ruby",
        "php" => "php",
        "lua" => "lua",
        "dart" => "dart",
        "ex" | "exs" => "elixir",
        "erl" => "erlang",
        "hs" => "haskell",
        "clj" | "cljs" => "clojure",
        "r" => "r",
        "sql" => "sql",
        "sh" | "bash" | "zsh" => "shellscript",
        "ps1" => "powershell",
        "bat" | "cmd" => "bat",
        "vue" => "vue",
        "svelte" => "svelte",
        "html" | "htm" => "html",
        "css" => "css",
        "scss" => "scss",
        "less" => "less",
        "md" | "markdown" => "markdown",
        "json" => "json",
        "jsonc" => "jsonc",
        "yaml" | "yml" => "yaml",
        "toml" => "toml",
        "xml" => "xml",
        "proto" => "proto3",
        "graphql" | "gql" => "graphql",
        "tf" => "terraform",
        "zig" => "zig",
        _ => PLAINTEXT,
    }
}

/// Classify a path, checking well-known file names before extensions
pub fn language_for_path(path: &Path) -> &'static str {
    if let Some(id) = path
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(language_for_file_name)
    {
        return id;
    }

    path.extension()
        .and_then(|e| e.to_str())
        .map(language_for_extension)
        .unwrap_or(PLAINTEXT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_extensions() {
        assert_eq!(language_for_path(Path::new("src/main.rs")), "rust");
        assert_eq!(language_for_path(Path::new("web/app.tsx")), "typescriptreact");
        assert_eq!(language_for_path(Path::new("lib/index.ts")), "typescript");
        assert_eq!(language_for_path(Path::new("tool.py")), "python");
        assert_eq!(language_for_path(Path::new("run.sh")), "shellscript");
    }

    #[test]
    fn test_extension_case_insensitive() {
        assert_eq!(language_for_path(Path::new("Main.JAVA")), "java");
        assert_eq!(language_for_extension("YML"), "yaml");
    }

    #[test]
    fn test_well_known_names() {
        assert_eq!(language_for_path(Path::new("docker/Dockerfile")), "dockerfile");
        assert_eq!(language_for_path(Path::new("Makefile")), "makefile");
        assert_eq!(language_for_path(Path::new("CMakeLists.txt")), "cmake");
    }

    #[test]
    fn test_unknown_falls_back_to_plaintext() {
        assert_eq!(language_for_path(Path::new("data.xyz")), PLAINTEXT);
        assert_eq!(language_for_path(Path::new("LICENSE")), PLAINTEXT);
    }
}

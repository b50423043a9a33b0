pub const APP_NAME: &str = "haga";

/// Default build description file name.
pub const DEFAULT_HAGA_FILE: &str = "HAGA.lua";

/// Build tree directory, relative to the invocation's working directory.
pub const BUILD_DIR_NAME: &str = "out";

/// Generated build graph file name inside the build tree.
pub const NINJA_FILE_NAME: &str = "build.ninja";

/// Suffix stripped from preprocessor inputs to derive their output name.
pub const TEMPLATE_SUFFIX: &str = ".in";

/// Suffix of the dependency file written next to a preprocessed output.
pub const DEPFILE_SUFFIX: &str = ".d";

/// Suffix of the sentinel file touched after a successful deployment.
pub const DEPLOY_SENTINEL_SUFFIX: &str = ".timestamp";

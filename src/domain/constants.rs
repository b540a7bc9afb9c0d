pub const DEFAULT_COMPILER: &str = "%EMSDK%/upstream/emscripten/emcc";
pub const DEFAULT_EXCLUDE_PREFIX: &str = "debug";
pub const DEFAULT_PROFILE: &str = "release";

/// Directory next to the config file holding the build record.
pub const STATE_DIR: &str = ".emkit";
pub const STATE_VERSION: u32 = 1;

/// WebGL context attributes as emitted by the emscripten GL library.
pub const CONTEXT_ATTRS_FIND: &str = r#""stencil":!!HEAP32[a+(8>>2)],"antialias""#;
/// Same attributes with `desynchronized` switched on for low-latency canvases.
pub const CONTEXT_ATTRS_DESYNCHRONIZED: &str =
    r#""stencil":!!HEAP32[a+(8>>2)],"desynchronized":true,"antialias""#;

//! Static grammar tables, one per language.
//!
//! Conventions shared by every table:
//! - MODULE patterns capture the imported name in group 1.
//! - STRUCT patterns capture the declared name in their last positional
//!   group; keyword groups are non-capturing so typedef-wrapped and bare
//!   declarations resolve the same way. `base` names the parent type.
//! - METHOD patterns use a `name` group and an optional `ret` group.

use super::stdlib::{
    StdlibFilter, C_STDLIB, GO_STDLIB, JAVA_STDLIB_PREFIXES, JS_BUILTINS, JS_BUILTIN_PREFIXES,
    PYTHON_STDLIB, RUBY_STDLIB, RUST_STDLIB, RUST_STDLIB_PREFIXES,
};
use super::{BodyStyle, LanguageGrammar, MethodPattern};
use crate::scanner::language_detect::Language;

/// Generic `identifier(` call token.
const CALL_IDENT: &str = r"\b(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*\(";

// ---- Rust ----

pub static RUST: LanguageGrammar = LanguageGrammar {
    language: Language::Rust,
    module_patterns: &[
        r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?use\s+([A-Za-z0-9_:]+)",
        r"(?m)^\s*extern\s+crate\s+([A-Za-z0-9_]+)",
        r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?mod\s+([A-Za-z0-9_]+)\s*;",
        r#"include!\s*\(\s*"([^"]+)"\s*\)"#,
    ],
    import_block: None,
    struct_patterns: &[
        r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?struct\s+([A-Za-z0-9_]+)",
        r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?enum\s+([A-Za-z0-9_]+)",
        r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?(?:unsafe\s+)?trait\s+([A-Za-z0-9_]+)(?:<[^>]*>)?(?:\s*:\s*(?P<base>[A-Za-z0-9_:]+))?",
        r"(?m)^\s*(?:unsafe\s+)?impl(?:<[^>]*>)?\s+(?:(?P<base>[A-Za-z0-9_:]+)(?:<[^>]*>)?\s+for\s+)?([A-Za-z0-9_]+)",
    ],
    method_patterns: &[
        MethodPattern::definition(
            r#"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?(?:const\s+)?(?:async\s+)?(?:unsafe\s+)?(?:extern\s+"[^"]*"\s+)?fn\s+(?P<name>[A-Za-z0-9_]+)\s*(?:<[^(]*>)?\s*\("#,
        ),
        MethodPattern::call(r"\bself\.(?P<name>[A-Za-z0-9_]+)\s*\("),
        MethodPattern::call(r"\b[A-Za-z0-9_]+::(?P<name>[A-Za-z0-9_]+)\s*\("),
        MethodPattern::call(CALL_IDENT),
    ],
    keywords: &[
        "if", "else", "while", "for", "loop", "match", "break", "continue", "return", "yield",
        "in", "where", "move", "mut", "ref", "type", "fn", "impl", "let", "as", "unsafe",
    ],
    builtin_types: &[
        "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128", "usize",
        "f32", "f64", "bool", "char", "str", "String", "Self", "Vec", "Option", "Result", "Box",
    ],
    stdlib: StdlibFilter {
        exact: RUST_STDLIB,
        prefixes: RUST_STDLIB_PREFIXES,
        root_separator: None,
    },
    body_style: BodyStyle::Braces,
    definition_keywords: &["fn"],
    skip_relative_imports: false,
};

// ---- C / C++ ----

pub static C: LanguageGrammar = LanguageGrammar {
    language: Language::C,
    module_patterns: &[
        r#"(?m)^\s*#\s*include\s*[<"]([^>"]+)[>"]"#,
        r#"(?m)^\s*#\s*import\s*[<"]([^>"]+)[>"]"#,
    ],
    import_block: None,
    struct_patterns: &[
        r"(?:typedef\s+struct)\s+([A-Za-z_]\w*)\s*\{[^}]*\}\s*([A-Za-z_]\w*)\s*;",
        r"(?:typedef\s+struct)\s*\{[^}]*\}\s*([A-Za-z_]\w*)\s*;",
        r"(?:typedef\s+enum)\s+([A-Za-z_]\w*)\s*\{[^}]*\}\s*([A-Za-z_]\w*)\s*;",
        r"\bstruct\s+([A-Za-z_]\w*)\s*\{",
        r"\benum\s+(?:class\s+)?([A-Za-z_]\w*)\s*\{",
        r"\bclass\s+([A-Za-z_]\w*)(?:\s*:\s*(?:public|protected|private)?\s*(?P<base>[A-Za-z_][\w:]*))?\s*\{",
        r"\bunion\s+([A-Za-z_]\w*)\s*\{",
    ],
    method_patterns: &[
        MethodPattern::definition(
            r"(?m)^[ \t]*(?:(?:static|extern|inline|virtual|const|unsigned|signed|struct)\s+)*(?P<ret>[A-Za-z_][\w:]*(?:\s*\*+\s*|\s+))(?:[A-Za-z_]\w*::)*(?P<name>[A-Za-z_]\w*)\s*\(",
        ),
        MethodPattern::call(r"\b[A-Za-z_]\w*::(?P<name>[A-Za-z_]\w*)\s*\("),
        MethodPattern::call(CALL_IDENT),
    ],
    keywords: &[
        "if", "else", "while", "for", "do", "switch", "case", "break", "continue", "return",
        "goto", "sizeof", "typedef", "volatile", "register", "auto", "struct", "union", "enum",
        "static", "extern", "const", "new", "delete",
    ],
    builtin_types: &[
        "void", "char", "short", "int", "long", "float", "double", "signed", "unsigned", "bool",
        "size_t", "ssize_t", "int8_t", "int16_t", "int32_t", "int64_t", "uint8_t", "uint16_t",
        "uint32_t", "uint64_t", "FILE",
    ],
    stdlib: StdlibFilter {
        exact: C_STDLIB,
        prefixes: &[],
        root_separator: None,
    },
    body_style: BodyStyle::Braces,
    definition_keywords: &[],
    skip_relative_imports: false,
};

// ---- JavaScript / TypeScript ----

const JS_MODULE_PATTERNS: &[&str] = &[
    r#"(?m)^\s*import\s+(?:[^;'"]*?\s+from\s+)?['"]([^'"]+)['"]"#,
    r#"\brequire\s*\(\s*['"]([^'"]+)['"]\s*\)"#,
    r#"(?m)^\s*export\s+(?:[^;'"]*?\s+)?from\s+['"]([^'"]+)['"]"#,
    r#"\bimport\s*\(\s*['"]([^'"]+)['"]\s*\)"#,
];

const JS_STRUCT_PATTERNS: &[&str] = &[
    r"(?m)^\s*(?:export\s+)?(?:default\s+)?(?:abstract\s+)?class\s+([A-Za-z0-9_$]+)(?:<[^>]*>)?(?:\s+extends\s+(?P<base>[A-Za-z0-9_$.]+))?",
    r"(?m)^\s*(?:export\s+)?interface\s+([A-Za-z0-9_$]+)(?:<[^>]*>)?(?:\s+extends\s+(?P<base>[A-Za-z0-9_$.]+))?",
    r"(?m)^\s*(?:export\s+)?type\s+([A-Za-z0-9_$]+)\s*(?:<[^>]*>)?\s*=",
    r"(?m)^\s*(?:export\s+)?(?:const\s+)?enum\s+([A-Za-z0-9_$]+)",
];

const JS_BUILTIN_TYPES: &[&str] = &[
    "void", "string", "number", "boolean", "any", "unknown", "never", "object", "Promise",
];

pub static JAVASCRIPT: LanguageGrammar = LanguageGrammar {
    language: Language::JavaScript,
    module_patterns: JS_MODULE_PATTERNS,
    import_block: None,
    struct_patterns: JS_STRUCT_PATTERNS,
    method_patterns: &[
        MethodPattern::definition(
            r"(?m)^\s*(?:export\s+)?(?:default\s+)?(?:async\s+)?function\s*\*?\s*(?P<name>[A-Za-z0-9_$]+)\s*(?:<[^>]*>)?\s*\(",
        ),
        MethodPattern::definition(
            r"(?m)^\s*(?:export\s+)?(?:const|let|var)\s+(?P<name>[A-Za-z0-9_$]+)\s*=\s*(?:async\s+)?function\b",
        ),
        MethodPattern::definition(
            r"(?m)^\s*(?:export\s+)?(?:const|let|var)\s+(?P<name>[A-Za-z0-9_$]+)\s*=\s*(?:async\s+)?\([^)]*\)\s*(?::\s*[^=]+)?=>",
        ),
        MethodPattern::definition(
            r"(?m)^\s*(?P<name>[A-Za-z0-9_$]+)\s*:\s*(?:async\s+)?function\s*\(",
        ),
        MethodPattern::definition(
            r"(?m)^\s*(?:(?:public|private|protected|static|async|readonly)\s+)*(?P<name>[A-Za-z0-9_$]+)\s*\([^)]*\)\s*(?::\s*(?P<ret>[A-Za-z0-9_$<>\[\]]+)\s*)?\{",
        ),
        MethodPattern::call(CALL_IDENT),
    ],
    keywords: &[
        "if", "else", "while", "for", "do", "switch", "case", "break", "continue", "return",
        "try", "catch", "finally", "throw", "typeof", "instanceof", "new", "class", "extends",
        "super", "import", "export", "default", "await", "function", "constructor",
    ],
    builtin_types: JS_BUILTIN_TYPES,
    stdlib: StdlibFilter {
        exact: JS_BUILTINS,
        prefixes: JS_BUILTIN_PREFIXES,
        root_separator: None,
    },
    body_style: BodyStyle::Braces,
    definition_keywords: &["function"],
    skip_relative_imports: true,
};

// ---- Go ----

pub static GO: LanguageGrammar = LanguageGrammar {
    language: Language::Go,
    module_patterns: &[r#"(?m)^\s*import\s+(?:[A-Za-z0-9_.]+\s+)?"([^"]+)""#],
    import_block: Some(r"(?m)^\s*import\s*\(([^)]*)\)"),
    struct_patterns: &[
        r"(?m)^\s*type\s+([A-Za-z0-9_]+)(?:\[[^\]]*\])?\s+struct\b",
        r"(?m)^\s*type\s+([A-Za-z0-9_]+)(?:\[[^\]]*\])?\s+interface\b",
    ],
    method_patterns: &[
        MethodPattern::definition(
            r"(?m)^\s*func\s+\([^)]*\)\s*(?P<name>[A-Za-z0-9_]+)\s*(?:\[[^\]]*\])?\s*\(",
        ),
        MethodPattern::definition(
            r"(?m)^\s*func\s+(?P<name>[A-Za-z0-9_]+)\s*(?:\[[^\]]*\])?\s*\(",
        ),
        MethodPattern::call(CALL_IDENT),
    ],
    keywords: &[
        "if", "else", "for", "range", "switch", "case", "break", "continue", "return", "goto",
        "fallthrough", "defer", "select", "type", "func", "go", "make", "new", "len",
    ],
    builtin_types: &[
        "int", "int8", "int16", "int32", "int64", "uint", "uint8", "uint16", "uint32",
        "uint64", "float32", "float64", "string", "bool", "byte", "rune", "error",
    ],
    stdlib: StdlibFilter {
        exact: GO_STDLIB,
        prefixes: &[],
        root_separator: None,
    },
    body_style: BodyStyle::Braces,
    definition_keywords: &["func"],
    skip_relative_imports: false,
};

// ---- Python ----

pub static PYTHON: LanguageGrammar = LanguageGrammar {
    language: Language::Python,
    module_patterns: &[
        r"(?m)^[ \t]*import[ \t]+([A-Za-z0-9_.]+)",
        r"(?m)^[ \t]*from[ \t]+([A-Za-z0-9_.]+)[ \t]+import\b",
        r#"__import__\s*\(\s*['"]([^'"]+)['"]\s*\)"#,
    ],
    import_block: None,
    struct_patterns: &[
        r"(?m)^[ \t]*class[ \t]+([A-Za-z0-9_]+)(?:[ \t]*\([ \t]*(?P<base>[A-Za-z0-9_.]+))?",
    ],
    method_patterns: &[
        MethodPattern::definition(
            r"(?m)^[ \t]*(?:async[ \t]+)?def[ \t]+(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*\(",
        ),
        MethodPattern::call(CALL_IDENT),
    ],
    keywords: &[
        "if", "else", "elif", "while", "for", "in", "try", "except", "finally", "with",
        "break", "continue", "return", "yield", "pass", "raise", "def", "class", "lambda",
        "and", "or", "not", "assert", "del",
    ],
    builtin_types: &[
        "int", "float", "str", "bool", "list", "dict", "tuple", "set", "bytes", "None",
    ],
    stdlib: StdlibFilter {
        exact: PYTHON_STDLIB,
        prefixes: &[],
        root_separator: Some('.'),
    },
    body_style: BodyStyle::Indented,
    definition_keywords: &["def", "async"],
    skip_relative_imports: true,
};

// ---- Java ----

pub static JAVA: LanguageGrammar = LanguageGrammar {
    language: Language::Java,
    module_patterns: &[r"(?m)^\s*import\s+(?:static\s+)?([A-Za-z0-9_.]+(?:\.\*)?)\s*;"],
    import_block: None,
    struct_patterns: &[
        r"(?m)^\s*(?:(?:public|protected|private|abstract|final|static|sealed)\s+)*class\s+([A-Za-z0-9_]+)(?:<[^>{]*>)?(?:\s+extends\s+(?P<base>[A-Za-z0-9_.]+))?",
        r"(?m)^\s*(?:(?:public|protected|private|abstract|static|sealed)\s+)*interface\s+([A-Za-z0-9_]+)(?:<[^>{]*>)?(?:\s+extends\s+(?P<base>[A-Za-z0-9_.]+))?",
        r"(?m)^\s*(?:(?:public|protected|private|static)\s+)*enum\s+([A-Za-z0-9_]+)",
        r"(?m)^\s*(?:(?:public|protected|private|static|final)\s+)*record\s+([A-Za-z0-9_]+)",
    ],
    method_patterns: &[
        MethodPattern::definition(
            r"(?m)^\s*(?:@\w+\s+)*(?:(?:public|protected|private|static|final|abstract|synchronized|native|default)\s+)*(?:<[^>]+>\s+)?(?P<ret>[A-Za-z0-9_.\[\]]+(?:<[^>()]*>)?(?:\[\])*)\s+(?P<name>[A-Za-z0-9_]+)\s*\(",
        ),
        MethodPattern::call(CALL_IDENT),
    ],
    keywords: &[
        "if", "else", "while", "for", "do", "switch", "case", "break", "continue", "return",
        "try", "catch", "finally", "throw", "throws", "instanceof", "new", "synchronized",
        "assert", "super", "this",
    ],
    builtin_types: &[
        "void", "int", "long", "short", "byte", "char", "float", "double", "boolean", "String",
        "Object",
    ],
    stdlib: StdlibFilter {
        exact: &[],
        prefixes: JAVA_STDLIB_PREFIXES,
        root_separator: None,
    },
    body_style: BodyStyle::Braces,
    definition_keywords: &[],
    skip_relative_imports: false,
};

// ---- PHP ----

pub static PHP: LanguageGrammar = LanguageGrammar {
    language: Language::Php,
    module_patterns: &[
        r#"(?m)^\s*(?:require|require_once|include|include_once)\s*\(?\s*['"]([^'"]+)['"]"#,
        r"(?m)^\s*use\s+([A-Za-z0-9_\\]+)",
    ],
    import_block: None,
    struct_patterns: &[
        r"(?m)^\s*(?:(?:abstract|final|readonly)\s+)*class\s+([A-Za-z0-9_]+)(?:\s+extends\s+(?P<base>[A-Za-z0-9_\\]+))?",
        r"(?m)^\s*interface\s+([A-Za-z0-9_]+)(?:\s+extends\s+(?P<base>[A-Za-z0-9_\\]+))?",
        r"(?m)^\s*trait\s+([A-Za-z0-9_]+)",
    ],
    method_patterns: &[
        MethodPattern::definition(
            r"(?m)^\s*(?:(?:public|private|protected|static|abstract|final)\s+)*function\s+&?(?P<name>[A-Za-z0-9_]+)\s*\(",
        ),
        MethodPattern::call(CALL_IDENT),
    ],
    keywords: &[
        "if", "else", "elseif", "while", "for", "foreach", "do", "switch", "case", "break",
        "continue", "return", "try", "catch", "finally", "throw", "instanceof", "function",
        "array", "isset", "empty", "unset", "list", "echo", "print", "new",
    ],
    builtin_types: &[
        "int", "float", "string", "bool", "array", "void", "mixed", "object", "callable",
        "iterable",
    ],
    stdlib: StdlibFilter::NONE,
    body_style: BodyStyle::Braces,
    definition_keywords: &["function"],
    skip_relative_imports: false,
};

// ---- Ruby ----

pub static RUBY: LanguageGrammar = LanguageGrammar {
    language: Language::Ruby,
    module_patterns: &[
        r#"(?m)^[ \t]*require[ \t]*\(?[ \t]*['"]([^'"]+)['"]"#,
        r#"(?m)^[ \t]*require_relative[ \t]*\(?[ \t]*['"]([^'"]+)['"]"#,
    ],
    import_block: None,
    struct_patterns: &[
        r"(?m)^[ \t]*class[ \t]+([A-Z][A-Za-z0-9_:]*)(?:[ \t]*<[ \t]*(?P<base>[A-Z][A-Za-z0-9_:]*))?",
        r"(?m)^[ \t]*module[ \t]+([A-Z][A-Za-z0-9_:]*)",
    ],
    method_patterns: &[
        MethodPattern::definition(
            r"(?m)^[ \t]*def[ \t]+(?:self\.)?(?P<name>[A-Za-z_][A-Za-z0-9_]*[?!=]?)",
        ),
        MethodPattern::definition(
            r"(?m)^[ \t]*define_method[ \t]*\(?[ \t]*:(?P<name>[A-Za-z_][A-Za-z0-9_]*[?!]?)",
        ),
        MethodPattern::call(r"\.(?P<name>[A-Za-z_][A-Za-z0-9_]*[?!]?)"),
        MethodPattern::call(r"\b(?P<name>[A-Za-z_][A-Za-z0-9_]*[?!]?)\("),
    ],
    keywords: &[
        "if", "else", "elsif", "unless", "while", "until", "for", "break", "next", "return",
        "yield", "begin", "rescue", "ensure", "retry", "redo", "def", "end", "do", "class",
        "module", "case", "when", "then", "and", "or", "not", "self", "super",
    ],
    builtin_types: &[],
    stdlib: StdlibFilter {
        exact: RUBY_STDLIB,
        prefixes: &[],
        root_separator: None,
    },
    body_style: BodyStyle::Indented,
    definition_keywords: &["def", "define_method"],
    skip_relative_imports: false,
};

// ---- Svelte ----

pub static SVELTE: LanguageGrammar = LanguageGrammar {
    language: Language::Svelte,
    module_patterns: &[
        r#"(?m)^\s*import\s+(?:[^;'"]*?\s+from\s+)?['"]([^'"]+)['"]"#,
        r#"(?m)^\s*export\s+(?:[^;'"]*?\s+)?from\s+['"]([^'"]+)['"]"#,
    ],
    import_block: None,
    struct_patterns: JS_STRUCT_PATTERNS,
    method_patterns: &[
        MethodPattern::definition(
            r"(?m)^\s*(?:export\s+)?(?:async\s+)?function\s+(?P<name>[A-Za-z0-9_$]+)\s*\(",
        ),
        MethodPattern::definition(
            r"(?m)^\s*(?:export\s+)?(?:const|let)\s+(?P<name>[A-Za-z0-9_$]+)\s*=\s*(?:async\s+)?\([^)]*\)\s*=>",
        ),
        MethodPattern::call(CALL_IDENT),
    ],
    keywords: &[
        "if", "else", "each", "await", "then", "catch", "as", "export", "const", "let", "var",
        "function", "import", "from", "return", "for", "while", "switch", "new", "typeof",
    ],
    builtin_types: JS_BUILTIN_TYPES,
    stdlib: StdlibFilter {
        exact: JS_BUILTINS,
        prefixes: JS_BUILTIN_PREFIXES,
        root_separator: None,
    },
    body_style: BodyStyle::Braces,
    definition_keywords: &["function"],
    skip_relative_imports: true,
};

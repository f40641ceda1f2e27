//! 提取规则与排除规则（进程启动时编译一次，只读共享）
use regex::bytes::Regex;

use crate::error::ScanError;

/// 主规则（源自 LinkFinder），两个互斥分支：
/// - 引号分支：`"` / `'` 或 `.open(`（可带请求方法参数）触发，字符类与 LinkFinder 一致，
///   绝对 URL 内允许空格与括号
/// - 属性分支：`url(` / `href=` / `src=` / `action=` 触发，值未加引号，
///   字符类排除空白、括号与尖括号，以 `)`、引号、`>` 或空白收尾
///
/// 每个分支依次尝试：绝对/协议相对 URL、同行相对路径、带扩展名的路径、较长路径段、常见扩展名的裸文件名
const PRIMARY_RULE: &str = r##"(?:"|'|\.open\(\s*(?:["'][A-Za-z]{3,7}["']\s*,\s*)?["'])(?:(?:[a-zA-Z]{1,10}://|//)[^"'/]{1,}\.[a-zA-Z]{2,}[^"']{0,}|(?:/|\.\./|\./)[^"'><,;| *()%$^/\\\[\]\r\n][^"'><,;|()\r\n]{1,}|[a-zA-Z0-9_\-/]{1,}/[a-zA-Z0-9_\-/]{1,}\.(?:[a-zA-Z]{1,4}|action)(?:[\?|#][^"|']{0,}|)|[a-zA-Z0-9_\-/]{1,}/[a-zA-Z0-9_\-/]{3,}(?:[\?|#][^"|']{0,}|)|[a-zA-Z0-9_\-]{1,}\.(?:php|asp|aspx|jsp|json|action|html|js|txt|xml)(?:[\?|#][^"|']{0,}|))(?:"|')|(?:url\(|href=|src=|action=)(?:(?:[a-zA-Z]{1,10}://|//)[^"'/\s()<>]{1,}\.[a-zA-Z]{2,}[^"'\s()<>]{0,}|(?:/|\.\./|\./)[^"'><,;| *()%$^/\\\[\]\s][^"'><,;|()\s]{1,}|[a-zA-Z0-9_\-/]{1,}/[a-zA-Z0-9_\-/]{1,}\.(?:[a-zA-Z]{1,4}|action)(?:[\?|#][^"|'\s()<>]{0,}|)|[a-zA-Z0-9_\-/]{1,}/[a-zA-Z0-9_\-/]{3,}(?:[\?|#][^"|'\s()<>]{0,}|)|[a-zA-Z0-9_\-]{1,}\.(?:php|asp|aspx|jsp|json|action|html|js|txt|xml)(?:[\?|#][^"|'\s()<>]{0,}|))(?:\)|"|'|>|\s)"##;

/// 模板字符串：以 `//` 或 `http(s)://` 开头的反引号串
const TEMPLATE_LITERAL_RULE: &str = r"`(?:https?://|//)[^`]*`";

/// 配置对象：`key: "value"`，key 可带引号
const CONFIG_OBJECT_RULE: &str =
    r#"["']?\b(?:endpoint|url|href|src|uri|path|target)["']?\s*:\s*["'][^"'\r\n]+["']"#;

/// API 端点：`/api/v?<数字>/...`
const API_ENDPOINT_RULE: &str = r#"/api/v?\d+/[^"'`\s<>()\[\],;]*"#;

/// 变量赋值：`const|let|var name = "url-like"`
const ASSIGNMENT_RULE: &str =
    r#"\b(?:const|let|var)\s+[A-Za-z_$][A-Za-z0-9_$]*\s*=\s*["'`](?:(?:https?:)?//|\.{0,2}/)[^"'`\r\n]*["'`]"#;

/// 文件类型 / 噪声域名排除
pub(crate) const EXCLUDE_FILE_TYPE_RULE: &str = r".css|.jpg|.jpeg|.png|.svg|.img|.gif|.mp4|.flv|.ogv|.webm|.webp|.mov|.mp3|.m4a|.m4p|.scss|.tif|.tiff|.ttf|.otf|.woff|.woff2|.bmp|.ico|.eot|.htc|.rtf|.swf|.image|w3.org|doubleclick.net|youtube.com|.vue|jquery|bootstrap|font|jsdelivr.net|vimeo.com|pinterest.com|facebook|linkedin|twitter|instagram|google|mozilla.org|jibe.com|schema.org|schemas.microsoft.com|wordpress.org|w.org|wix.com|parastorage.com|whatwg.org|polyfill.io|typekit.net|schemas.openxmlformats.org|openweathermap.org|openoffice.org|reactjs.org|angularjs.org|java.com|purl.org|/image|/img|/css|/wp-json|/wp-content|/wp-includes|/theme|/audio|/captcha|/font|robots.txt|node_modules|.wav|.gltf|.js";

/// MIME 类型排除
pub(crate) const EXCLUDE_MIME_TYPE_RULE: &str = r"text/css|image/jpeg|image/jpg|image/png|image/svg+xml|image/gif|image/tiff|image/webp|image/bmp|image/x-icon|image/vnd.microsoft.icon|font/ttf|font/woff|font/woff2|font/x-woff2|font/x-woff|font/otf|audio/mpeg|audio/wav|audio/webm|audio/aac|audio/ogg|video/mp4|video/mpeg|video/webm|video/ogg|video/mp2t|video/x-msvideo|application/font-woff|application/font-woff2|application/vnd.android.package-archive|binary/octet-stream|application/octet-stream|application/pdf|application/x-font-ttf|application/x-font-otf|application/json|text/javascript|text/plain|text/x-yaml|text/html|text/babel|text/markdown|text/tsx|application/typescript|application/javascript|text/x-handlebars-template|application/x-typescript|text/x-gfm|text/jsx";

/// 规则类别；声明顺序即优先级（去重时先到者胜）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    Primary,
    TemplateLiteral,
    ConfigObject,
    ApiEndpoint,
    Assignment,
}

impl PatternKind {
    pub const ALL: [PatternKind; 5] = [
        PatternKind::Primary,
        PatternKind::TemplateLiteral,
        PatternKind::ConfigObject,
        PatternKind::ApiEndpoint,
        PatternKind::Assignment,
    ];

    fn source(self) -> &'static str {
        match self {
            PatternKind::Primary => PRIMARY_RULE,
            PatternKind::TemplateLiteral => TEMPLATE_LITERAL_RULE,
            PatternKind::ConfigObject => CONFIG_OBJECT_RULE,
            PatternKind::ApiEndpoint => API_ENDPOINT_RULE,
            PatternKind::Assignment => ASSIGNMENT_RULE,
        }
    }
}

/// 已编译的规则集合（字节级，直接在原始缓冲区上匹配）
#[derive(Debug)]
pub struct PatternEngine {
    pub(crate) rules: Vec<(PatternKind, Regex)>,
    exclude_file_type: Regex,
    exclude_mime_type: Regex,
}

impl PatternEngine {
    /// 使用内置排除规则构建
    pub fn new() -> Result<Self, ScanError> {
        Self::with_exclusions(&[], &[])
    }

    /// 构建规则集合；额外排除分支以 `|` 追加到对应的内置排除规则之后
    pub fn with_exclusions(extra_file_types: &[String], extra_mime_types: &[String]) -> Result<Self, ScanError> {
        let mut rules = Vec::with_capacity(PatternKind::ALL.len());
        for kind in PatternKind::ALL {
            rules.push((kind, compile(kind.source())?));
        }
        Ok(Self {
            rules,
            exclude_file_type: compile(&alternation(EXCLUDE_FILE_TYPE_RULE, extra_file_types))?,
            exclude_mime_type: compile(&alternation(EXCLUDE_MIME_TYPE_RULE, extra_mime_types))?,
        })
    }

    /// 清洗后的 URL 命中任一排除规则即丢弃
    pub fn is_excluded(&self, url: &str) -> bool {
        self.exclude_file_type.is_match(url.as_bytes()) || self.exclude_mime_type.is_match(url.as_bytes())
    }
}

fn alternation(base: &str, extra: &[String]) -> String {
    let extra: Vec<&str> = extra.iter().map(|s| s.as_str()).filter(|s| !s.is_empty()).collect();
    if extra.is_empty() { return base.to_string(); }
    format!("{}|{}", base, extra.join("|"))
}

fn compile(pat: &str) -> Result<Regex, ScanError> {
    Regex::new(pat).map_err(|e| ScanError::Config(format!("invalid pattern {pat:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(kind: PatternKind, text: &str) -> Vec<String> {
        let engine = PatternEngine::new().unwrap();
        let (_, re) = engine.rules.iter().find(|(k, _)| *k == kind).unwrap();
        re.find_iter(text.as_bytes()).map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned()).collect()
    }

    #[test]
    fn rules_are_in_priority_order() {
        let engine = PatternEngine::new().unwrap();
        let kinds: Vec<_> = engine.rules.iter().map(|(k, _)| *k).collect();
        assert_eq!(kinds, PatternKind::ALL.to_vec());
    }

    #[test]
    fn primary_rule_alternatives() {
        assert_eq!(matches(PatternKind::Primary, r#"a = "https://x.com/p?q=1";"#), vec![r#""https://x.com/p?q=1""#]);
        assert_eq!(matches(PatternKind::Primary, "a = '//cdn.x.com/lib'"), vec!["'//cdn.x.com/lib'"]);
        assert_eq!(matches(PatternKind::Primary, r#"fetch("/api/users")"#), vec![r#""/api/users""#]);
        assert_eq!(matches(PatternKind::Primary, r#"x("../up/one")"#), vec![r#""../up/one""#]);
        assert_eq!(matches(PatternKind::Primary, r#"x("admin/panel.php")"#), vec![r#""admin/panel.php""#]);
        assert_eq!(matches(PatternKind::Primary, r#"x("users/profile")"#), vec![r#""users/profile""#]);
        assert_eq!(matches(PatternKind::Primary, r#"x('login.aspx?next=1')"#), vec!["'login.aspx?next=1'"]);
        assert_eq!(matches(PatternKind::Primary, "background: url(/assets/bg)"), vec!["url(/assets/bg)"]);
        assert_eq!(matches(PatternKind::Primary, "<a href=/docs/intro>"), vec!["href=/docs/intro>"]);
    }

    #[test]
    fn primary_rule_quoted_absolute_keeps_spaces_and_parens() {
        assert_eq!(
            matches(PatternKind::Primary, r#"var w = "https://x.com/search?q=a b";"#),
            vec![r#""https://x.com/search?q=a b""#]
        );
        assert_eq!(
            matches(PatternKind::Primary, r#"var w = "https://en.wikipedia.org/wiki/Foo_(bar)";"#),
            vec![r#""https://en.wikipedia.org/wiki/Foo_(bar)""#]
        );
        assert_eq!(matches(PatternKind::Primary, "go('//x.com/a <b>')"), vec!["'//x.com/a <b>'"]);
    }

    #[test]
    fn primary_rule_unquoted_attribute_stops_at_delimiters() {
        assert_eq!(matches(PatternKind::Primary, "url(https://x.com/bg) no-repeat"), vec!["url(https://x.com/bg)"]);
        assert_eq!(matches(PatternKind::Primary, "<form action=/account/save method=post>"), vec!["action=/account/save "]);
    }

    #[test]
    fn primary_rule_open_call() {
        assert_eq!(
            matches(PatternKind::Primary, r#"xhr.open("POST", "/api/v1/login")"#),
            vec![r#".open("POST", "/api/v1/login""#]
        );
        assert_eq!(matches(PatternKind::Primary, "window.open('/account/settings')"), vec![".open('/account/settings'"]);
        assert!(matches(PatternKind::Primary, r#"xhr.open("GET", url)"#).is_empty());
    }

    #[test]
    fn primary_rule_ignores_plain_words() {
        assert!(matches(PatternKind::Primary, r#"var s = "hello world";"#).is_empty());
    }

    #[test]
    fn template_literal_rule() {
        assert_eq!(matches(PatternKind::TemplateLiteral, "f(`https://x.com/u/${id}`)"), vec!["`https://x.com/u/${id}`"]);
        assert!(matches(PatternKind::TemplateLiteral, "f(`/relative/${id}`)").is_empty());
        assert_eq!(
            matches(PatternKind::TemplateLiteral, r#"f(`https://x.com/wiki/Foo_(bar) baz?q="1"`)"#),
            vec![r#"`https://x.com/wiki/Foo_(bar) baz?q="1"`"#]
        );
    }

    #[test]
    fn config_object_rule() {
        assert_eq!(matches(PatternKind::ConfigObject, r#"{endpoint: "/graphql"}"#), vec![r#"endpoint: "/graphql""#]);
        assert_eq!(matches(PatternKind::ConfigObject, r#"{"url":"https://x.com"}"#), vec![r#""url":"https://x.com""#]);
        assert!(matches(PatternKind::ConfigObject, r#"{name: "x"}"#).is_empty());
        assert_eq!(matches(PatternKind::ConfigObject, r#"c = { url: "/search/(x) y" }"#), vec![r#"url: "/search/(x) y""#]);
        // 值内不允许出现引号，遇到即收尾
        assert_eq!(matches(PatternKind::ConfigObject, r#"{path: '/say/"hi"'}"#), vec![r#"path: '/say/""#]);
    }

    #[test]
    fn api_endpoint_rule() {
        assert_eq!(matches(PatternKind::ApiEndpoint, "get('/api/v2/users/1')"), vec!["/api/v2/users/1"]);
        assert_eq!(matches(PatternKind::ApiEndpoint, "/api/3/items"), vec!["/api/3/items"]);
        assert!(matches(PatternKind::ApiEndpoint, "/api/users").is_empty());
        // 无包裹符号：空白与括号即终止
        assert_eq!(matches(PatternKind::ApiEndpoint, "get('/api/v1/search?q=a b')"), vec!["/api/v1/search?q=a"]);
        assert_eq!(matches(PatternKind::ApiEndpoint, "call(/api/v1/items(3))"), vec!["/api/v1/items"]);
    }

    #[test]
    fn assignment_rule() {
        assert_eq!(matches(PatternKind::Assignment, "const BASE = 'https://x.com/v1';"), vec!["const BASE = 'https://x.com/v1'"]);
        assert_eq!(matches(PatternKind::Assignment, "let p=\"/login\""), vec!["let p=\"/login\""]);
        assert!(matches(PatternKind::Assignment, "var n = 'name'").is_empty());
        assert_eq!(
            matches(PatternKind::Assignment, r#"var w = "https://x.com/wiki/Foo_(bar) baz";"#),
            vec![r#"var w = "https://x.com/wiki/Foo_(bar) baz""#]
        );
        assert_eq!(matches(PatternKind::Assignment, "let q = `/say/\"hi\"`"), vec!["let q = `/say/\""]);
    }

    #[test]
    fn default_exclusions() {
        let engine = PatternEngine::new().unwrap();
        assert!(engine.is_excluded("https://cdn.example.com/app.js"));
        assert!(engine.is_excluded("/static/logo.png"));
        assert!(engine.is_excluded("https://www.google.com/recaptcha"));
        assert!(engine.is_excluded("application/json"));
        assert!(!engine.is_excluded("/api/v2/users"));
    }

    #[test]
    fn extra_exclusions_extend_defaults() {
        let engine = PatternEngine::with_exclusions(&["internal\\.corp".to_string()], &[]).unwrap();
        assert!(engine.is_excluded("https://internal.corp/x"));
        assert!(engine.is_excluded("/a/b.css"));
    }

    #[test]
    fn invalid_extra_exclusion_is_config_error() {
        let err = PatternEngine::with_exclusions(&["(".to_string()], &[]).unwrap_err();
        assert!(matches!(err, ScanError::Config(_)));
    }
}

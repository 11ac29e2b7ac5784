//! Code block highlighting for the presentation layer.

use crate::ui::theme::Theme;
use ratatui::style::{Color as TuiColor, Style};
use ratatui::text::{Line, Span};
use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, MutexGuard, OnceLock};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

pub const DEFAULT_CACHE_CAPACITY: usize = 64;

pub trait Highlighter: Send + Sync {
    /// Styled lines for `code`, or `None` when the caller should fall back to
    /// plain rendering.
    fn highlight(&self, language: &str, code: &str, theme: &Theme) -> Option<Vec<Line<'static>>>;
}

/// Never highlights; code blocks render with the theme's code style.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainHighlighter;

impl Highlighter for PlainHighlighter {
    fn highlight(&self, _language: &str, _code: &str, _theme: &Theme) -> Option<Vec<Line<'static>>> {
        None
    }
}

type CacheKey = (String, u64);

// Bounded FIFO cache; key = (normalized language, hash of code + theme)
struct SimpleCache {
    map: HashMap<CacheKey, Vec<Line<'static>>>,
    order: VecDeque<CacheKey>,
    cap: usize,
}

impl SimpleCache {
    fn new(cap: usize) -> Self {
        Self {
            map: HashMap::new(),
            order: VecDeque::new(),
            cap,
        }
    }

    fn get(&self, k: &CacheKey) -> Option<Vec<Line<'static>>> {
        self.map.get(k).cloned()
    }

    fn put(&mut self, k: CacheKey, v: Vec<Line<'static>>) {
        if !self.map.contains_key(&k) {
            self.order.push_back(k.clone());
        }
        self.map.insert(k, v);
        while self.map.len() > self.cap {
            match self.order.pop_front() {
                Some(old) => {
                    self.map.remove(&old);
                }
                None => break,
            }
        }
    }

    fn len(&self) -> usize {
        self.map.len()
    }
}

/// Highlights with syntect's bundled syntaxes and themes, loaded on first use.
pub struct SyntectHighlighter {
    cache: Mutex<SimpleCache>,
}

impl SyntectHighlighter {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            cache: Mutex::new(SimpleCache::new(cap.max(1))),
        }
    }

    fn cache(&self) -> MutexGuard<'_, SimpleCache> {
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn cached_blocks(&self) -> usize {
        self.cache().len()
    }
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme_set() -> &'static ThemeSet {
    static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();
    THEME_SET.get_or_init(ThemeSet::load_defaults)
}

impl Highlighter for SyntectHighlighter {
    fn highlight(&self, language: &str, code: &str, theme: &Theme) -> Option<Vec<Line<'static>>> {
        let lang_norm = normalize_lang_hint(language);
        let ps = syntax_set();
        let ts = theme_set();

        let theme_name = pick_syntect_theme_name_for_theme(theme);
        let syn_theme = ts
            .themes
            .get(theme_name)
            .or_else(|| ts.themes.get("base16-ocean.dark"))?;

        let theme_sig = build_theme_signature(theme, theme_name);
        let key = (lang_norm.clone(), hash_code(&lang_norm, code, &theme_sig));
        if let Some(lines) = self.cache().get(&key) {
            return Some(lines);
        }

        let syntax = ps
            .find_syntax_by_token(&lang_norm)
            .unwrap_or_else(|| ps.find_syntax_plain_text());
        let mut h = HighlightLines::new(syntax, syn_theme);
        let bg = theme.md_codeblock_bg_color();

        let mut out: Vec<Line<'static>> = Vec::new();
        for line in LinesWithEndings::from(code) {
            let ranges = h.highlight_line(line, ps).ok()?;
            let spans: Vec<Span<'static>> = ranges
                .into_iter()
                .map(|(style, text)| {
                    let frag = text.strip_suffix('\n').unwrap_or(text);
                    let frag = frag.strip_suffix('\r').unwrap_or(frag);
                    let mut st = Style::default().fg(TuiColor::Rgb(
                        style.foreground.r,
                        style.foreground.g,
                        style.foreground.b,
                    ));
                    if let Some(bgcol) = bg {
                        st = st.bg(bgcol);
                    }
                    Span::styled(frag.to_string(), st)
                })
                .filter(|span| !span.content.is_empty())
                .collect();
            out.push(Line::from(spans));
        }

        self.cache().put(key, out.clone());
        Some(out)
    }
}

fn hash_code(lang: &str, code: &str, theme_sig: &str) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    lang.hash(&mut hasher);
    code.hash(&mut hasher);
    theme_sig.hash(&mut hasher);
    hasher.finish()
}

fn is_dark_background(c: &TuiColor) -> bool {
    match c {
        TuiColor::Rgb(r, g, b) => {
            let br = 0.2126 * (*r as f32) + 0.7152 * (*g as f32) + 0.0722 * (*b as f32);
            br < 128.0
        }
        TuiColor::White => false,
        _ => true,
    }
}

pub(crate) fn normalize_lang_hint(s: &str) -> String {
    let t = s.trim().to_ascii_lowercase();
    match t.as_str() {
        "py" | "python" => "python".into(),
        "bash" | "sh" | "zsh" | "shell" => "bash".into(),
        "js" | "javascript" | "jsx" => "javascript".into(),
        "ts" | "tsx" | "typescript" => "typescript".into(),
        "yaml" | "yml" => "yaml".into(),
        "rust" | "rs" => "rust".into(),
        "c" | "h" => "c".into(),
        "cpp" | "cc" | "cxx" | "hpp" | "hxx" => "cpp".into(),
        "kotlin" | "kt" => "kotlin".into(),
        "" => "text".into(),
        other => other.into(),
    }
}

pub(crate) fn pick_syntect_theme_name_for_theme(theme: &Theme) -> &'static str {
    if is_dark_background(&theme.background_color) {
        "base16-ocean.dark"
    } else {
        "InspiredGitHub"
    }
}

fn build_theme_signature(theme: &Theme, chosen_syntect: &str) -> String {
    format!(
        "{}|{:?}|{:?}",
        chosen_syntect,
        theme.md_codeblock_bg_color(),
        theme.background_color
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    #[test]
    fn normalize_lang_hint_maps_common_aliases() {
        assert_eq!(normalize_lang_hint("py"), "python");
        assert_eq!(normalize_lang_hint("JS"), "javascript");
        assert_eq!(normalize_lang_hint("TsX"), "typescript");
        assert_eq!(normalize_lang_hint("yml"), "yaml");
        assert_eq!(normalize_lang_hint("hpp"), "cpp");
        assert_eq!(normalize_lang_hint(" rs "), "rust");
        assert_eq!(normalize_lang_hint(""), "text");
    }

    #[test]
    fn dark_background_heuristic_basic() {
        assert!(is_dark_background(&Color::Black));
        assert!(!is_dark_background(&Color::White));
        assert!(is_dark_background(&Color::Rgb(10, 10, 10)));
        assert!(!is_dark_background(&Color::Rgb(240, 240, 240)));
    }

    #[test]
    fn theme_selection_matches_brightness() {
        assert_eq!(
            pick_syntect_theme_name_for_theme(&Theme::dark_default()),
            "base16-ocean.dark"
        );
        assert_eq!(
            pick_syntect_theme_name_for_theme(&Theme::light()),
            "InspiredGitHub"
        );
    }

    #[test]
    fn highlights_one_line_per_source_line() {
        let highlighter = SyntectHighlighter::new();
        let code = "fn main() {\n    println!(\"hi\");\n}";
        let lines = highlighter
            .highlight("rs", code, &Theme::dark_default())
            .expect("highlighted");

        assert_eq!(lines.len(), 3);
        let text: Vec<String> = lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert_eq!(text, vec!["fn main() {", "    println!(\"hi\");", "}"]);
    }

    #[test]
    fn repeated_blocks_hit_the_cache() {
        let highlighter = SyntectHighlighter::with_capacity(2);
        let theme = Theme::dark_default();
        highlighter.highlight("python", "x = 1", &theme);
        highlighter.highlight("python", "x = 1", &theme);
        assert_eq!(highlighter.cached_blocks(), 1);

        highlighter.highlight("python", "y = 2", &theme);
        highlighter.highlight("python", "z = 3", &theme);
        assert_eq!(highlighter.cached_blocks(), 2);
    }

    #[test]
    fn plain_highlighter_declines() {
        assert!(PlainHighlighter
            .highlight("rust", "fn x() {}", &Theme::dark_default())
            .is_none());
    }
}

// Fri Oct 16 2026 - Alex

/// Decoder from a linker-visible symbol to a readable signature.
///
/// Implementations must be pure and must hand unrecognized input back
/// unchanged rather than fail.
pub trait Demangle: Send + Sync {
    fn demangle(&self, mangled: &str) -> String;
}

/// Metrowerks CodeWarrior (PowerPC EABI) name decoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeWarriorDemangler;

impl Demangle for CodeWarriorDemangler {
    fn demangle(&self, mangled: &str) -> String {
        try_demangle(mangled)
    }
}

/// Returns every symbol untouched. Useful when the dump is already readable.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughDemangler;

impl Demangle for PassthroughDemangler {
    fn demangle(&self, mangled: &str) -> String {
        mangled.to_string()
    }
}

pub fn demangle(name: &str) -> Option<String> {
    let name = name.trim().trim_matches('"');

    // Leading underscores belong to special names such as `__ct`.
    let mut search_from = 1;
    while let Some(found) = name.get(search_from..).and_then(|s| s.find("__")) {
        let split = search_from + found;
        let (func, rest) = (&name[..split], &name[split + 2..]);

        if !func.is_empty() {
            if let Some(result) = demangle_split(func, rest) {
                return Some(result);
            }
        }

        search_from = split + 1;
    }

    None
}

/// Decodes a bare scope encoding such as `4Base` or `Q24Game3Foo`.
pub fn demangle_type_name(encoded: &str) -> Option<String> {
    let mut parser = CodeWarriorParser::new(encoded);
    let scope = parser.parse_scope()?;
    if !parser.at_end() {
        return None;
    }
    Some(scope.join("::"))
}

pub fn try_demangle(name: &str) -> String {
    demangle(name).unwrap_or_else(|| name.to_string())
}

fn demangle_split(func: &str, rest: &str) -> Option<String> {
    let mut parser = CodeWarriorParser::new(rest);

    let scope = if parser.peek() == Some('F') {
        Vec::new()
    } else {
        parser.parse_scope()?
    };

    let is_const = parser.eat('C');

    if parser.at_end() {
        // Data symbol or a special like `__vt`.
        if scope.is_empty() || is_const {
            return None;
        }
        let name = special_name(func, &scope).unwrap_or_else(|| func.to_string());
        return Some(format!("{}::{}", scope.join("::"), name));
    }

    if !parser.eat('F') {
        return None;
    }

    let params = parser.parse_parameters()?;
    if parser.eat('_') {
        // Encoded return type, only present on template functions.
        parser.parse_type()?;
    }
    if !parser.at_end() {
        return None;
    }

    let name = special_name(func, &scope).unwrap_or_else(|| func.to_string());
    let mut out = String::new();
    for qualifier in &scope {
        out.push_str(qualifier);
        out.push_str("::");
    }
    out.push_str(&name);
    out.push('(');
    out.push_str(&params.join(", "));
    out.push(')');
    if is_const {
        out.push_str(" const");
    }

    Some(out)
}

fn special_name(func: &str, scope: &[String]) -> Option<String> {
    let class = scope.last().map(|s| strip_template(s));

    match func {
        "__ct" => class.map(str::to_string),
        "__dt" => class.map(|c| format!("~{}", c)),
        _ if func.starts_with("__op") => {
            let mut parser = CodeWarriorParser::new(&func[4..]);
            let ty = parser.parse_type()?;
            Some(format!("operator {}", ty))
        }
        _ => operator_name(func).map(|op| format!("operator{}", op)),
    }
}

fn strip_template(name: &str) -> &str {
    match name.find('<') {
        Some(idx) => &name[..idx],
        None => name,
    }
}

fn operator_name(code: &str) -> Option<&'static str> {
    let op = match code {
        "__nw" => " new",
        "__nwa" => " new[]",
        "__dl" => " delete",
        "__dla" => " delete[]",
        "__pl" => "+",
        "__mi" => "-",
        "__ml" => "*",
        "__dv" => "/",
        "__md" => "%",
        "__er" => "^",
        "__ad" => "&",
        "__or" => "|",
        "__co" => "~",
        "__nt" => "!",
        "__as" => "=",
        "__lt" => "<",
        "__gt" => ">",
        "__apl" => "+=",
        "__ami" => "-=",
        "__amu" => "*=",
        "__adv" => "/=",
        "__amd" => "%=",
        "__aer" => "^=",
        "__aad" => "&=",
        "__aor" => "|=",
        "__ls" => "<<",
        "__rs" => ">>",
        "__ars" => ">>=",
        "__als" => "<<=",
        "__eq" => "==",
        "__ne" => "!=",
        "__le" => "<=",
        "__ge" => ">=",
        "__aa" => "&&",
        "__oo" => "||",
        "__pp" => "++",
        "__mm" => "--",
        "__cm" => ",",
        "__rm" => "->*",
        "__rf" => "->",
        "__cl" => "()",
        "__vc" => "[]",
        _ => return None,
    };
    Some(op)
}

struct CodeWarriorParser<'a> {
    input: &'a str,
    pos: usize,
    params: Vec<String>,
}

impl<'a> CodeWarriorParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            params: Vec::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn parse_number(&mut self) -> Option<usize> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
        }
        self.input[start..self.pos].parse().ok()
    }

    fn parse_digit(&mut self) -> Option<usize> {
        let c = self.peek()?;
        let digit = c.to_digit(10)? as usize;
        self.pos += 1;
        Some(digit)
    }

    fn parse_source_name(&mut self) -> Option<String> {
        let len = self.parse_number()?;
        if len == 0 {
            return None;
        }
        let end = self.pos.checked_add(len)?;
        let name = self.input.get(self.pos..end)?;
        self.pos = end;
        Some(demangle_template_args(name))
    }

    fn parse_scope(&mut self) -> Option<Vec<String>> {
        if self.eat('Q') {
            let depth = self.parse_digit()?;
            if depth == 0 {
                return None;
            }
            let mut names = Vec::with_capacity(depth);
            for _ in 0..depth {
                names.push(self.parse_source_name()?);
            }
            Some(names)
        } else {
            Some(vec![self.parse_source_name()?])
        }
    }

    fn parse_parameters(&mut self) -> Option<Vec<String>> {
        let rest = &self.input[self.pos..];
        if rest == "v" || rest.starts_with("v_") {
            self.pos += 1;
            return Some(Vec::new());
        }

        self.params.clear();
        while !self.at_end() && self.peek() != Some('_') {
            if self.eat('N') {
                let count = self.parse_digit()?;
                let index = self.parse_digit()?;
                let repeated = self.params.get(index.checked_sub(1)?)?.clone();
                for _ in 0..count {
                    self.params.push(repeated.clone());
                }
                continue;
            }

            let ty = self.parse_type()?;
            self.params.push(ty);
        }

        Some(std::mem::take(&mut self.params))
    }

    fn parse_function_type(&mut self) -> Option<(String, String)> {
        let saved = std::mem::take(&mut self.params);
        let params = self.parse_parameters();
        self.params = saved;
        let params = params?;

        let ret = if self.eat('_') {
            self.parse_type()?
        } else {
            "void".to_string()
        };

        Some((ret, params.join(", ")))
    }

    fn parse_type(&mut self) -> Option<String> {
        let c = self.peek()?;

        let ty = match c {
            'v' => { self.advance(); "void".to_string() }
            'b' => { self.advance(); "bool".to_string() }
            'c' => { self.advance(); "char".to_string() }
            's' => { self.advance(); "short".to_string() }
            'i' => { self.advance(); "int".to_string() }
            'l' => { self.advance(); "long".to_string() }
            'x' => { self.advance(); "long long".to_string() }
            'f' => { self.advance(); "float".to_string() }
            'd' => { self.advance(); "double".to_string() }
            'r' => { self.advance(); "long double".to_string() }
            'w' => { self.advance(); "wchar_t".to_string() }
            'e' => { self.advance(); "...".to_string() }
            'U' => {
                self.advance();
                format!("unsigned {}", self.parse_type()?)
            }
            'S' => {
                self.advance();
                format!("signed {}", self.parse_type()?)
            }
            'C' => {
                self.advance();
                with_cv(self.parse_type()?, "const")
            }
            'V' => {
                self.advance();
                with_cv(self.parse_type()?, "volatile")
            }
            'P' | 'R' => {
                self.advance();
                let sigil = if c == 'P' { "*" } else { "&" };
                if self.eat('F') {
                    let (ret, params) = self.parse_function_type()?;
                    format!("{} ({})({})", ret, sigil, params)
                } else {
                    format!("{}{}", self.parse_type()?, sigil)
                }
            }
            'M' => {
                self.advance();
                let class = self.parse_scope()?.join("::");
                if self.eat('F') {
                    let (ret, params) = self.parse_function_type()?;
                    format!("{} ({}::*)({})", ret, class, params)
                } else {
                    format!("{} {}::*", self.parse_type()?, class)
                }
            }
            'A' => {
                self.advance();
                let len = self.parse_number()?;
                if !self.eat('_') {
                    return None;
                }
                format!("{}[{}]", self.parse_type()?, len)
            }
            'F' => {
                self.advance();
                let (ret, params) = self.parse_function_type()?;
                format!("{} ({})", ret, params)
            }
            'T' => {
                self.advance();
                let index = self.parse_digit()?;
                self.params.get(index.checked_sub(1)?)?.clone()
            }
            'Q' | '0'..='9' => self.parse_scope()?.join("::"),
            _ => return None,
        };

        Some(ty)
    }
}

fn with_cv(inner: String, qualifier: &str) -> String {
    if inner.ends_with('*') || inner.ends_with('&') {
        format!("{} {}", inner, qualifier)
    } else {
        format!("{} {}", qualifier, inner)
    }
}

/// Template instances keep their argument list verbatim in the length-prefixed
/// name, so `TVec<f>` becomes `TVec<float>` when every argument decodes.
fn demangle_template_args(name: &str) -> String {
    let (open, close) = match (name.find('<'), name.rfind('>')) {
        (Some(open), Some(close)) if open < close => (open, close),
        _ => return name.to_string(),
    };

    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut start = open + 1;
    let inner = &name[..close];

    for (idx, c) in inner.char_indices().skip_while(|(i, _)| *i <= open) {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                args.push(&name[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    args.push(&name[start..close]);

    let mut decoded = Vec::with_capacity(args.len());
    for arg in args {
        let mut parser = CodeWarriorParser::new(arg);
        match parser.parse_type() {
            Some(ty) if parser.at_end() => decoded.push(ty),
            // Non-type arguments such as `3` stay as written.
            _ => decoded.push(arg.to_string()),
        }
    }

    format!("{}<{}>{}", &name[..open], decoded.join(", "), &name[close + 1..])
}

/// Text cursor over one SRT chunk
///
/// Every `read_*` method consumes input only when it succeeds, so a failed
/// match leaves the position where the field was expected.
pub struct SrtCursor<'a> {
    text: &'a str,
    pub pos: usize,
}

impl<'a> SrtCursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    pub fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Unconsumed remainder of the chunk
    pub fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    /// Consume the longest prefix whose characters satisfy `accept`.
    /// Returns `None` when not even one character matches.
    pub fn read_while(&mut self, accept: impl Fn(char) -> bool) -> Option<&'a str> {
        let rest = self.rest();
        let len = rest
            .char_indices()
            .find(|&(_, c)| !accept(c))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        if len == 0 {
            return None;
        }
        self.pos += len;
        Some(&rest[..len])
    }

    /// Consume one or more whitespace characters (line breaks included)
    pub fn skip_whitespace(&mut self) -> bool {
        self.read_while(char::is_whitespace).is_some()
    }

    /// Consume exactly one whitespace character
    pub fn skip_one_whitespace(&mut self) -> bool {
        match self.peek_char() {
            Some(c) if c.is_whitespace() => {
                self.pos += c.len_utf8();
                true
            }
            _ => false,
        }
    }

    /// Consume `literal` if the input continues with it
    pub fn expect(&mut self, literal: &str) -> bool {
        if self.rest().starts_with(literal) {
            self.pos += literal.len();
            true
        } else {
            false
        }
    }

    /// Consume a non-empty run of text up to `delimiter`, and the delimiter.
    pub fn read_until(&mut self, delimiter: char) -> Option<&'a str> {
        let rest = self.rest();
        let end = rest.find(delimiter)?;
        if end == 0 {
            return None;
        }
        self.pos += end + delimiter.len_utf8();
        Some(&rest[..end])
    }

    /// Consume everything that is left
    pub fn read_to_end(&mut self) -> &'a str {
        let rest = self.rest();
        self.pos = self.text.len();
        rest
    }
}

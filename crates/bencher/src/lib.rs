#[derive(Debug, Clone)]
pub struct TestCase {
    name: &'static str,
    group: TestGroup,
    payload: Payload,
}

impl TestCase {
    pub fn new(name: &'static str, group: TestGroup, payload: Payload) -> Self {
        Self { name, group, payload }
    }

    pub fn small(name: &'static str, payload: Payload) -> Self {
        Self::new(name, TestGroup::Small, payload)
    }

    pub fn normal(name: &'static str, payload: Payload) -> Self {
        Self::new(name, TestGroup::Normal, payload)
    }

    pub fn large(name: &'static str, payload: Payload) -> Self {
        Self::new(name, TestGroup::Large, payload)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group(&self) -> TestGroup {
        self.group
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn content(&self) -> &[u8] {
        self.payload.content()
    }
}

/// A response body to compress.
#[derive(Debug, Clone)]
pub struct Payload {
    content: Vec<u8>,
}

impl Payload {
    /// Repeats an html-ish snippet up to `size` bytes, compresses well.
    pub fn text(size: usize) -> Self {
        const SNIPPET: &[u8] = b"<li class=\"item\"><a href=\"/items/42\">micro-compress</a> hello world</li>\n";
        let content = SNIPPET.iter().copied().cycle().take(size).collect();
        Self { content }
    }

    /// Pseudo random bytes from a fixed seed, barely compresses.
    pub fn noise(size: usize) -> Self {
        let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
        let content = (0..size)
            .map(|_| {
                // xorshift64
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                state.to_le_bytes()[0]
            })
            .collect();
        Self { content }
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[derive(Clone, Copy, Debug)]
pub enum TestGroup {
    Small,
    Normal,
    Large,
}

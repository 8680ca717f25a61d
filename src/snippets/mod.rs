//! Canned example snippets, addressed by id `1`..`7`.

/// Text the editor starts with when nothing else is requested.
pub const STARTER: &str = "def foo(bar, baz):\n    pass\nfoo(42)\n";

const CATALOG: &[(&str, &str, &str)] = &[
    (
        "1",
        "late binding",
        "methods = []\nfor i in range(10):\n    methodds.append(lambda x: x + i)\nprint(methods[0](10))",
    ),
    ("2", "loop", "for i in range(5):\n    print(i)\n"),
    ("3", "comprehension", "print([x*x for x in range(20) if x % 2 == 0])"),
    ("4", "big integer", "print(45**123)"),
    (
        "5",
        "generator",
        "# Generator example\ndef genr(n):\n    i = 0\n    while i < n:\n        yield i\n        i += 1\n\nprint(list(genr(12)))\n",
    ),
    (
        "6",
        "class",
        "# Class example\nclass Person:\n    def __init__(self, name, age):\n        self.name = name\n        self.age = age\n    \n    def greet(self):\n        print(f'Hello, I am {self.name}')\n\np = Person('Alice', 30)\np.greet()\n",
    ),
    (
        "7",
        "fibonacci",
        "# Fibonacci\ndef fib(n):\n    if n <= 1:\n        return n\n    return fib(n-1) + fib(n-2)\n\nfor i in range(10):\n    print(fib(i))\n",
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snippet {
    pub id: &'static str,
    pub title: &'static str,
    pub code: &'static str,
}

pub fn lookup(id: &str) -> Option<Snippet> {
    let id = id.trim();
    CATALOG
        .iter()
        .find(|(sid, _, _)| *sid == id)
        .map(|&(id, title, code)| Snippet { id, title, code })
}

pub fn all() -> impl Iterator<Item = Snippet> {
    CATALOG.iter().map(|&(id, title, code)| Snippet { id, title, code })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_ids() {
        assert_eq!(lookup("4").map(|s| s.code), Some("print(45**123)"));
        assert_eq!(lookup(" 2 ").map(|s| s.title), Some("loop"));
    }

    #[test]
    fn test_lookup_unknown_id() {
        assert!(lookup("0").is_none());
        assert!(lookup("8").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn test_catalog_ids_are_sequential() {
        let ids: Vec<_> = all().map(|s| s.id).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6", "7"]);
    }
}

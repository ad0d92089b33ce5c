use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// A cell label: a unique name plus the text printed for it.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Symbol {
    name: String,
    label: String,
}

impl Symbol {
    pub fn new(name: &str, label: &str) -> Self {
        Self { name: name.to_owned(), label: label.to_owned() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Symbol index within its [`SymbolSet`].
pub type SymbolId = usize;

/// An ordered alphabet of [`Symbol`]s, unique by name, with optional named subsets such as "every turn".
///
/// Every cell of a [`SymbolGrid`](crate::grid::SymbolGrid) takes exactly one symbol of one set.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SymbolSet {
    symbols: Vec<Symbol>,
    subsets: BTreeMap<String, Vec<SymbolId>>,
}

impl SymbolSet {
    pub fn new<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut set = Self::default();
        for (name, label) in pairs {
            set.append(name, label);
        }
        set
    }

    /// Append a symbol, returning its id. A symbol of the same name that is already present wins and keeps its label.
    pub fn append(&mut self, name: &str, label: &str) -> SymbolId {
        match self.index_of(name) {
            Some(existing) => existing,
            None => {
                self.symbols.push(Symbol::new(name, label));
                self.symbols.len() - 1
            }
        }
    }

    pub fn index_of(&self, name: &str) -> Option<SymbolId> {
        self.symbols.iter().position(|symbol| symbol.name == name)
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols.iter().enumerate()
    }

    /// Name a group of existing symbols. Unknown member names are skipped.
    pub fn define_subset(&mut self, name: &str, members: &[&str]) -> &mut Self {
        let ids = members.iter().filter_map(|member| self.index_of(member)).collect();
        self.subsets.insert(name.to_owned(), ids);
        self
    }

    pub fn subset(&self, name: &str) -> Option<&[SymbolId]> {
        self.subsets.get(name).map(Vec::as_slice)
    }

    /// Union by name, keeping first-seen order. Subsets are re-resolved against the merged set and unioned by name.
    pub fn merge(&mut self, other: &SymbolSet) -> &mut Self {
        for symbol in &other.symbols {
            self.append(&symbol.name, &symbol.label);
        }

        for (name, ids) in &other.subsets {
            let members = ids.iter()
                .filter_map(|id| other.get(*id))
                .filter_map(|symbol| self.index_of(&symbol.name))
                .collect::<Vec<_>>();
            let merged = self.subsets.entry(name.clone()).or_default();
            for member in members {
                if !merged.contains(&member) {
                    merged.push(member);
                }
            }
        }

        self
    }
}

// Fri Oct 16 2026 - Alex

use crate::symbol::error::SymbolError;
use crate::symbol::qualifier::QualifiedPath;
use std::fs;
use std::path::Path;

/// One record of the global symbol map.
///
/// Column layout:
/// `004149a0 0000b4 8041a060  4 read__12MapCollisionFR6Stream  sysCommonU.a mapCollision.cpp`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolMapEntry {
    pub address: u32,
    pub size: u32,
    pub virtual_address: u32,
    pub alignment: u32,
    pub mangled_name: String,
    pub module: Option<String>,
    pub source_file: Option<String>,
}

impl SymbolMapEntry {
    pub fn parse(line: &str) -> Option<Self> {
        let columns: Vec<&str> = line.split_whitespace().collect();
        if columns.len() < 5 {
            return None;
        }

        Some(Self {
            address: u32::from_str_radix(columns[0], 16).ok()?,
            size: u32::from_str_radix(columns[1], 16).ok()?,
            virtual_address: u32::from_str_radix(columns[2], 16).ok()?,
            alignment: columns[3].parse().ok()?,
            mangled_name: columns[4].to_string(),
            module: columns.get(5).map(|s| s.to_string()),
            source_file: columns.get(6).map(|s| s.to_string()),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SymbolMap {
    entries: Vec<SymbolMapEntry>,
}

impl SymbolMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps only word-aligned, used, non-vtable, non-thunk records.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries = Vec::new();
        let mut rejected = 0usize;

        for line in lines {
            let line = line.as_ref();
            if line.trim().is_empty()
                || line.contains("UNUSED")
                || line.contains("__vt__")
                || line.contains('@')
            {
                continue;
            }

            match SymbolMapEntry::parse(line) {
                Some(entry) if entry.alignment == 4 => entries.push(entry),
                Some(_) => {}
                None => rejected += 1,
            }
        }

        if rejected > 0 {
            log::debug!("Skipped {} symbol map lines that did not parse", rejected);
        }

        Self { entries }
    }

    pub fn load(path: &Path) -> Result<Self, SymbolError> {
        let contents = fs::read_to_string(path)?;
        let map = Self::from_lines(contents.lines());
        log::info!("Loaded {} symbol map records from {}", map.len(), path.display());
        Ok(map)
    }

    pub fn entries(&self) -> &[SymbolMapEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records whose mangled scope is exactly `scope_prefix` (see [`scope_prefix`]).
    pub fn members_of<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a SymbolMapEntry> + 'a {
        let needle = format!("__{}", prefix);
        self.entries.iter().filter(move |entry| {
            entry.mangled_name.match_indices(&needle).any(|(idx, _)| {
                let tail = &entry.mangled_name[idx + needle.len()..];
                tail.is_empty() || tail.starts_with('F') || tail.starts_with('C')
            })
        })
    }
}

/// Length-prefixed mangled scope of a class, `Q<depth><len><name>...` when
/// nested and `<len><name>` at namespace scope.
pub fn scope_prefix(qualifiers: &QualifiedPath, name: &str) -> String {
    let mut prefix = String::new();
    if !qualifiers.is_empty() {
        prefix.push('Q');
        prefix.push_str(&(qualifiers.len() + 1).to_string());
    }
    for component in qualifiers.iter().chain(std::iter::once(name)) {
        prefix.push_str(&component.len().to_string());
        prefix.push_str(component);
    }
    prefix
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = "\
  004149a0 0000b4 8041a060  4 read__12MapCollisionFR6Stream \tsysCommonU.a mapCollision.cpp
  00414a54 000040 8041a114  4 __ct__12MapCollisionFv \tsysCommonU.a mapCollision.cpp
  00414a94 000040 8041a154  4 __vt__12MapCollision \tsysCommonU.a mapCollision.cpp
  00414ad4 000008 8041a194  4 @4@read__12MapCollisionFR6Stream \tsysCommonU.a mapCollision.cpp
  UNUSED   000030 ........ read__13MapCollision2Fv sysCommonU.a mapCollision.cpp
  00414adc 000001 8041a19c  1 sFlag__12MapCollision \tsysCommonU.a mapCollision.cpp
  00414ae0 000020 8041a1a0  4 update__Q24Game12MapCollisionFv \tsysCommonU.a mapCollision.cpp";

    #[test]
    fn test_parse_entry() {
        let entry = SymbolMapEntry::parse(
            "004149a0 0000b4 8041a060  4 read__12MapCollisionFR6Stream \tsysCommonU.a mapCollision.cpp",
        )
        .unwrap();
        assert_eq!(entry.address, 0x4149a0);
        assert_eq!(entry.size, 0xb4);
        assert_eq!(entry.virtual_address, 0x8041a060);
        assert_eq!(entry.alignment, 4);
        assert_eq!(entry.mangled_name, "read__12MapCollisionFR6Stream");
        assert_eq!(entry.source_file.as_deref(), Some("mapCollision.cpp"));
    }

    #[test]
    fn test_filtering() {
        let map = SymbolMap::from_lines(MAP.lines());
        let names: Vec<_> = map.entries().iter().map(|e| e.mangled_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "read__12MapCollisionFR6Stream",
                "__ct__12MapCollisionFv",
                "update__Q24Game12MapCollisionFv"
            ]
        );
    }

    #[test]
    fn test_scope_prefix() {
        assert_eq!(scope_prefix(&QualifiedPath::default(), "Base"), "4Base");
        assert_eq!(
            scope_prefix(&QualifiedPath::parse("Game"), "MapCollision"),
            "Q24Game12MapCollision"
        );
    }

    #[test]
    fn test_members_of_matches_exact_scope() {
        let map = SymbolMap::from_lines(MAP.lines());
        let plain = scope_prefix(&QualifiedPath::default(), "MapCollision");
        let members: Vec<_> = map.members_of(&plain).map(|e| e.mangled_name.as_str()).collect();
        assert_eq!(members, vec!["read__12MapCollisionFR6Stream", "__ct__12MapCollisionFv"]);

        let nested = scope_prefix(&QualifiedPath::parse("Game"), "MapCollision");
        assert_eq!(map.members_of(&nested).count(), 1);
    }
}

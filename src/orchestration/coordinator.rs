// Fri Oct 16 2026 - Alex

use crate::config::Config;
use crate::orchestration::discovery::VtableSource;
use crate::output::{HeaderEmitter, OutputSink, RenderedHeader};
use crate::structure::{
    repair_offsets, ReconstructError, RepairReport, SlotClassifier, StructureRegistry, VtableDump,
};
use crate::symbol::{
    CodeWarriorDemangler, Demangle, PassthroughDemangler, SymbolError, SymbolMap, WeakSymbolSet,
};
use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;

/// Everything produced for one table.
#[derive(Debug)]
pub struct Reconstruction {
    pub registry: StructureRegistry,
    pub diagnostics: Vec<ReconstructError>,
    pub thunks_skipped: usize,
    pub repair: RepairReport,
    pub header: RenderedHeader,
}

impl Reconstruction {
    pub fn emitted_slots(&self) -> usize {
        self.registry.slot_count()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedVtable {
    pub label: String,
    pub origin: Option<PathBuf>,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub vtables_found: usize,
    pub headers_emitted: usize,
    pub slots_emitted: usize,
    pub written: Vec<PathBuf>,
    pub overwritten: Vec<PathBuf>,
    pub failed: Vec<FailedVtable>,
    pub malformed_slots: usize,
    pub thunks_skipped: usize,
    pub slots_repaired: usize,
}

impl RunSummary {
    pub fn summary(&self) -> String {
        format!(
            "Vtables: {}, Headers: {}, Slots: {}, Failed: {}, Malformed slots: {}, Thunks: {}, Repaired: {}",
            self.vtables_found,
            self.headers_emitted,
            self.slots_emitted,
            self.failed.len(),
            self.malformed_slots,
            self.thunks_skipped,
            self.slots_repaired
        )
    }
}

/// Runs classify, repair and emit for each table against shared read-only
/// symbol data.
pub struct ReconstructionCoordinator {
    config: Config,
    demangler: Box<dyn Demangle>,
    weak_symbols: Option<WeakSymbolSet>,
    symbol_map: Option<SymbolMap>,
}

impl ReconstructionCoordinator {
    pub fn new(config: Config) -> Self {
        let demangler: Box<dyn Demangle> = if config.demangle_symbols {
            Box::new(CodeWarriorDemangler)
        } else {
            Box::new(PassthroughDemangler)
        };

        Self {
            config,
            demangler,
            weak_symbols: None,
            symbol_map: None,
        }
    }

    /// Builds a coordinator and loads the maps named in `config`.
    pub fn from_config(config: Config) -> Result<Self, SymbolError> {
        let weak_symbols = config.linker_map.as_deref().map(WeakSymbolSet::load).transpose()?;
        let symbol_map = config.symbol_map.as_deref().map(SymbolMap::load).transpose()?;

        let mut coordinator = Self::new(config);
        if let Some(weak) = weak_symbols {
            log::info!("Loaded {} weak symbols", weak.len());
            coordinator = coordinator.with_weak_symbols(weak);
        }
        if let Some(map) = symbol_map {
            log::info!("Loaded {} symbol map entries", map.len());
            coordinator = coordinator.with_symbol_map(map);
        }
        Ok(coordinator)
    }

    pub fn with_weak_symbols(mut self, weak_symbols: WeakSymbolSet) -> Self {
        self.weak_symbols = Some(weak_symbols);
        self
    }

    pub fn with_symbol_map(mut self, symbol_map: SymbolMap) -> Self {
        self.symbol_map = Some(symbol_map);
        self
    }

    pub fn reconstruct(
        &self,
        dump: &VtableDump,
        include_guard: bool,
    ) -> Result<Reconstruction, ReconstructError> {
        let layout = self.config.layout();

        let mut classifier = SlotClassifier::new(self.demangler.as_ref(), layout);
        if let Some(weak) = &self.weak_symbols {
            classifier = classifier.with_weak_symbols(weak);
        }
        let mut classification = classifier.classify(dump)?;

        let repair = if self.config.repair_offsets {
            repair_offsets(&mut classification.registry, layout)
        } else {
            RepairReport::default()
        };

        let mut emitter = HeaderEmitter::new(self.demangler.as_ref())
            .with_include_guard(include_guard)
            .with_original_dump(self.config.include_original_dump)
            .with_disclaimer(self.config.include_disclaimer);
        if self.config.extra_declarations {
            if let Some(map) = &self.symbol_map {
                emitter = emitter.with_symbol_map(map);
            }
        }
        let header = emitter.render(&classification.registry, dump);

        log::info!(
            "Reconstructed {} with {} bases",
            header.class_name,
            classification.registry.derivative_count()
        );

        Ok(Reconstruction {
            registry: classification.registry,
            diagnostics: classification.diagnostics,
            thunks_skipped: classification.thunks_skipped,
            repair,
            header,
        })
    }

    /// Reconstructs every source and hands the headers to `sink` in input
    /// order. A failing table is recorded and the batch moves on.
    pub fn run_batch(
        &self,
        sources: &[VtableSource],
        sink: &OutputSink,
        progress: Option<&ProgressBar>,
    ) -> RunSummary {
        let include_guard = !sink.is_console();
        let build = |source: &VtableSource| {
            let result = self.reconstruct(&source.dump, include_guard);
            if let Some(bar) = progress {
                bar.inc(1);
            }
            result
        };

        let results: Vec<_> = if self.config.parallel {
            sources.par_iter().map(build).collect()
        } else {
            sources.iter().map(build).collect()
        };

        let mut summary = RunSummary {
            vtables_found: sources.len(),
            ..RunSummary::default()
        };
        let mut seen = HashSet::new();

        for (source, result) in sources.iter().zip(results) {
            let reconstruction = match result {
                Ok(r) => r,
                Err(e) => {
                    log::warn!("Skipping {}: {}", source.describe(), e);
                    summary.failed.push(FailedVtable {
                        label: source.dump.label.clone(),
                        origin: source.origin.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            summary.slots_emitted += reconstruction.emitted_slots();
            summary.malformed_slots += reconstruction.diagnostics.len();
            summary.thunks_skipped += reconstruction.thunks_skipped;
            summary.slots_repaired += reconstruction.repair.inserted();

            if let Some(path) = sink.target_path(&reconstruction.header) {
                if !seen.insert(path.clone()) {
                    log::warn!(
                        "{} maps to {} again, overwriting",
                        source.describe(),
                        path.display()
                    );
                    summary.overwritten.push(path);
                }
            }

            match sink.write(&reconstruction.header) {
                Ok(written) => {
                    summary.headers_emitted += 1;
                    summary.written.extend(written);
                }
                Err(e) => {
                    log::warn!("Skipping {}: {}", source.describe(), e);
                    summary.failed.push(FailedVtable {
                        label: source.dump.label.clone(),
                        origin: source.origin.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::{VirtualSlot, VtableLayout};

    fn coordinator() -> ReconstructionCoordinator {
        ReconstructionCoordinator::new(Config::default().with_parallel(false))
    }

    fn dump(label: &str, operands: &[&str]) -> VtableDump {
        VtableDump::from_operands(label, operands.iter().copied())
    }

    #[test]
    fn test_scenario_pure_virtual_only() {
        let result = coordinator().reconstruct(&dump("__vt__4Base", &["0", "0", "0"]), true).unwrap();
        let parent = result.registry.parent();

        assert_eq!(parent.symbols, vec![VirtualSlot::placeholder(8)]);
        assert!(result.header.text.contains("virtual void _08() = 0;"));
    }

    #[test]
    fn test_scenario_single_class() {
        let result = coordinator()
            .reconstruct(&dump("__vt__4Base", &["0", "0", "foo__4BaseFv", "__dt__4BaseFv"]), true)
            .unwrap();

        assert_eq!(result.registry.derivative_count(), 0);
        assert_eq!(result.registry.parent().slot_count(), 2);
        assert!(result.header.text.contains("struct Base {"));
        assert!(!result.header.text.contains(" : public"));
        assert!(result.header.text.contains("virtual ~Base();"));
    }

    #[test]
    fn test_scenario_inherited_base() {
        let result = coordinator()
            .reconstruct(&dump("__vt__7Derived", &["0", "0", "foo__4BaseFv", "bar__7DerivedFv"]), true)
            .unwrap();

        let base = result.registry.derivative("Base").unwrap();
        assert_eq!(base.symbols[0].name.as_deref(), Some("foo()"));
        let parent = result.registry.parent();
        assert_eq!(parent.symbols[0].name.as_deref(), Some("bar()"));
        assert_eq!(parent.symbols[0].offset, 0x0C);
        assert!(result.header.text.contains("struct Derived : public Base {"));
        assert_eq!(result.header.relative_path, PathBuf::from("Derived.h"));
    }

    #[test]
    fn test_scenario_thunk_dropped() {
        let result = coordinator()
            .reconstruct(
                &dump("__vt__4Base", &["0", "0", "foo__4BaseFv", "@4@foo__4BaseFv", "bar__4BaseFv"]),
                true,
            )
            .unwrap();

        assert_eq!(result.thunks_skipped, 1);
        let offsets: Vec<_> = result.registry.parent().symbols.iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0x08, 0x10]);
        assert!(!result.header.text.contains("virtual void @"));
    }

    #[test]
    fn test_slot_count_matches_operands() {
        let table = dump(
            "__vt__Q24Game7Derived",
            &[
                "0",
                "0",
                "__dt__Q24Game7DerivedFv",
                "@8@__dt__Q24Game7DerivedFv",
                "foo__Q24Game4BaseFv",
                "0",
                "bar__Q24Game7DerivedFi",
            ],
        );
        let coordinator = ReconstructionCoordinator::new(Config::default().with_repair(false));
        let result = coordinator.reconstruct(&table, true).unwrap();

        assert_eq!(result.emitted_slots(), table.slot_count() - result.thunks_skipped);
    }

    #[test]
    fn test_base_offsets_follow_positions_after_repair() {
        let table = dump(
            "__vt__7Derived",
            &["0", "0", "__dt__7DerivedFv", "foo__4BaseFv", "bar__7DerivedFv", "baz__4BaseFv"],
        );
        let result = coordinator().reconstruct(&table, true).unwrap();
        let layout = VtableLayout::header();

        let base = result.registry.derivative("Base").unwrap();
        for (index, slot) in base.symbols.iter().enumerate() {
            assert_eq!(slot.offset, layout.offset_of(index));
        }
        assert_eq!(base.symbols[0].name.as_deref(), Some("~Base()"));
        assert_eq!(result.repair.inserted(), 2);
        assert_eq!(
            result.emitted_slots(),
            table.slot_count() + result.repair.inserted()
        );
    }

    #[test]
    fn test_weak_and_extra_declarations() {
        let weak = WeakSymbolSet::from_lines(["  00000010 000008 80001230  4 foo__4BaseFv \tbase.o (func,weak)"]);
        let map = SymbolMap::from_lines([
            "  00000000 000040 80001000  4 __ct__4BaseFv \tbase.a base.cpp",
            "  00000040 000010 80001040  4 foo__4BaseFv \tbase.a base.cpp",
            "  00000050 000010 80001050  4 reset__4BaseFi \tbase.a base.cpp",
        ]);
        let coordinator = coordinator().with_weak_symbols(weak).with_symbol_map(map);
        let result = coordinator.reconstruct(&dump("__vt__4Base", &["0", "0", "foo__4BaseFv"]), true).unwrap();

        assert!(result.registry.parent().symbols[0].is_weak);
        assert!(result.header.text.contains("// _08 (weak)"));
        assert!(result.header.text.contains("\tBase();"));
        assert!(result.header.text.contains("\tvoid reset(int);"));
        assert!(!result.header.text.contains("\tvoid foo();"));
    }

    #[test]
    fn test_batch_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        let sink = OutputSink::directory(dir.path());
        let sources = vec![
            VtableSource { origin: None, dump: dump("__vt__4Base", &["0", "0", "foo__4BaseFv"]) },
            VtableSource { origin: None, dump: dump("__vt__", &["0", "0", "0"]) },
            VtableSource { origin: None, dump: dump("__vt__5Empty", &["0", "0"]) },
            VtableSource { origin: None, dump: dump("__vt__Q24Game4Piki", &["0", "0", "0"]) },
        ];

        let summary = ReconstructionCoordinator::new(Config::default()).run_batch(&sources, &sink, None);

        assert_eq!(summary.vtables_found, 4);
        assert_eq!(summary.headers_emitted, 3);
        assert_eq!(summary.slots_emitted, 2);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].label, "__vt__");
        assert!(dir.path().join("Base.h").is_file());

        let empty = std::fs::read_to_string(dir.path().join("Empty.h")).unwrap();
        assert!(empty.contains("struct Empty {\n};"));

        let piki = std::fs::read_to_string(dir.path().join("Game").join("Piki.h")).unwrap();
        assert!(piki.starts_with("#ifndef _GAME_PIKI_H"));
    }

    #[test]
    fn test_readable_dump_without_demangling() {
        let mut config = Config::default();
        config.demangle_symbols = false;
        let result = ReconstructionCoordinator::new(config)
            .reconstruct(&dump("__vt__4Base", &["0", "0", "Base::operator<<(int)"]), false)
            .unwrap();

        assert_eq!(result.registry.parent().symbols[0].name.as_deref(), Some("operator<<(int)"));
        assert!(result.header.text.contains("virtual void operator<<(int);"));
    }

    #[test]
    fn test_batch_reports_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let sink = OutputSink::directory(dir.path());
        let sources = vec![
            VtableSource { origin: None, dump: dump("__vt__4Base", &["0", "0", "foo__4BaseFv"]) },
            VtableSource { origin: None, dump: dump("__vt__4Base", &["0", "0", "bar__4BaseFv"]) },
        ];

        let summary = coordinator().run_batch(&sources, &sink, None);

        assert_eq!(summary.overwritten, vec![dir.path().join("Base.h")]);
        let text = std::fs::read_to_string(dir.path().join("Base.h")).unwrap();
        assert!(text.contains("bar()"));
    }
}

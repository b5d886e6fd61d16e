use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, warn};
use mantori_config::GenerationConfig;
use mantori_util::resource_location::{InvalidResourceLocation, ResourceLocation};
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::structure::{
    StructureKind, StructureType,
    pool::{StructurePool, StructurePoolEntry, StructurePoolRegistry, template::TemplateManager},
};

const STRUCTURE_DIR: &str = "worldgen/structure";
const TEMPLATE_POOL_DIR: &str = "worldgen/template_pool";
const TEMPLATE_DIR: &str = "structure";

#[derive(Error, Debug)]
pub enum DatapackError {
    #[error("Failed to read {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("Failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Structure {structure} starts from unknown pool {pool}")]
    UnknownPool {
        structure: ResourceLocation,
        pool: ResourceLocation,
    },
    #[error("{owner} uses unknown template {template}")]
    UnknownTemplate {
        owner: ResourceLocation,
        template: ResourceLocation,
    },
    #[error("{path} does not map to a valid id: {source}")]
    InvalidId {
        path: PathBuf,
        source: InvalidResourceLocation,
    },
}

/// Every structure, template pool and template a datapack defines.
#[derive(Default)]
pub struct StructureRegistry {
    structures: BTreeMap<ResourceLocation, StructureKind>,
    pub pools: StructurePoolRegistry,
    pub templates: TemplateManager,
}

impl StructureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &GenerationConfig) -> Result<Self, DatapackError> {
        Self::load(&config.datapack_path)
    }

    /// Loads `data/<namespace>/...` below `datapack_root` and checks that every reference resolves.
    pub fn load(datapack_root: &Path) -> Result<Self, DatapackError> {
        let mut registry = Self::new();
        let data = datapack_root.join("data");
        if !data.is_dir() {
            warn!("No data directory in datapack {}", datapack_root.display());
            return Ok(registry);
        }

        let mut namespaces = Vec::new();
        for entry in fs::read_dir(&data).map_err(|source| io_error(&data, source))? {
            let entry = entry.map_err(|source| io_error(&data, source))?;
            if entry.path().is_dir() {
                namespaces.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        namespaces.sort();

        for namespace in &namespaces {
            let root = data.join(namespace);
            for (id, template) in read_entries(&root.join(TEMPLATE_DIR), namespace)? {
                registry.templates.register(id, template);
            }
            let pools = read_entries::<StructurePool>(&root.join(TEMPLATE_POOL_DIR), namespace)?;
            for (id, pool) in pools {
                registry.pools.register(id, pool);
            }
            for (id, path) in json_files(&root.join(STRUCTURE_DIR), namespace)? {
                if let Some(structure) = read_structure(&path)? {
                    registry.register(id, structure);
                } else {
                    warn!("Skipping structure {id}, its type is not supported");
                }
            }
        }

        registry.validate()?;
        debug!(
            "Loaded {} structures, {} template pools and {} templates from {}",
            registry.len(),
            registry.pools.len(),
            registry.templates.len(),
            datapack_root.display()
        );
        Ok(registry)
    }

    pub fn register(&mut self, id: ResourceLocation, structure: StructureKind) {
        if self.structures.insert(id.clone(), structure).is_some() {
            warn!("Structure {id} registered twice, keeping the last one");
        }
    }

    /// Start pools and pool elements must resolve. Jigsaws pointing at missing pools only warn,
    /// the assembler skips them.
    pub fn validate(&self) -> Result<(), DatapackError> {
        for (id, structure) in &self.structures {
            let StructureKind::End(end) = structure;
            match end.start_pool() {
                StructurePoolEntry::Reference(pool) if !self.pools.contains(pool) => {
                    return Err(DatapackError::UnknownPool {
                        structure: id.clone(),
                        pool: pool.clone(),
                    });
                }
                StructurePoolEntry::Reference(_) => {}
                StructurePoolEntry::Direct(pool) => self.check_templates(id, pool)?,
            }
        }

        for (id, pool) in self.pools.iter() {
            self.check_templates(id, pool)?;
            if !self.pools.contains(&pool.fallback) {
                warn!("Template pool {id} falls back to unknown pool {}", pool.fallback);
            }
        }

        for (id, template) in self.templates.iter() {
            for jigsaw in &template.jigsaws {
                if !self.pools.contains(&jigsaw.pool) {
                    warn!(
                        "Jigsaw {} in template {id} targets unknown pool {}",
                        jigsaw.name, jigsaw.pool
                    );
                }
            }
        }
        Ok(())
    }

    fn check_templates(
        &self,
        owner: &ResourceLocation,
        pool: &StructurePool,
    ) -> Result<(), DatapackError> {
        let missing = pool
            .elements
            .iter()
            .flat_map(|entry| entry.element.template_locations())
            .find(|location| !self.templates.contains(location));
        match missing {
            Some(template) => Err(DatapackError::UnknownTemplate {
                owner: owner.clone(),
                template: template.clone(),
            }),
            None => Ok(()),
        }
    }

    pub fn get(&self, id: &ResourceLocation) -> Option<&StructureKind> {
        self.structures.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ResourceLocation, &StructureKind)> {
        self.structures.iter()
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }
}

fn io_error(path: &Path, source: io::Error) -> DatapackError {
    DatapackError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DatapackError> {
    let content = fs::read_to_string(path).map_err(|source| io_error(path, source))?;
    serde_json::from_str(&content).map_err(|source| DatapackError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn read_entries<T: DeserializeOwned>(
    dir: &Path,
    namespace: &str,
) -> Result<Vec<(ResourceLocation, T)>, DatapackError> {
    json_files(dir, namespace)?
        .into_iter()
        .map(|(id, path)| Ok((id, read_json(&path)?)))
        .collect()
}

/// Structures of a type we can't place decode to `None`.
fn read_structure(path: &Path) -> Result<Option<StructureKind>, DatapackError> {
    let value: serde_json::Value = read_json(path)?;
    let kind = value
        .get("type")
        .and_then(serde_json::Value::as_str)
        .and_then(|kind| kind.parse().ok())
        .and_then(|kind| StructureType::from_id(&kind));
    if kind.is_none() {
        return Ok(None);
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(|source| DatapackError::Json {
            path: path.to_path_buf(),
            source,
        })
}

/// All `.json` files below `dir`, keyed by the id their relative path names. Sorted by id.
fn json_files(
    dir: &Path,
    namespace: &str,
) -> Result<Vec<(ResourceLocation, PathBuf)>, DatapackError> {
    let mut files = Vec::new();
    if !dir.is_dir() {
        return Ok(files);
    }

    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in fs::read_dir(&current).map_err(|source| io_error(&current, source))? {
            let path = entry.map_err(|source| io_error(&current, source))?.path();
            if path.is_dir() {
                pending.push(path);
                continue;
            }
            if path.extension().is_none_or(|extension| extension != "json") {
                continue;
            }
            let relative = path.strip_prefix(dir).unwrap_or(&path).with_extension("");
            let relative = relative
                .components()
                .map(|component| component.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let id = format!("{namespace}:{relative}")
                .parse()
                .map_err(|source| DatapackError::InvalidId {
                    path: path.clone(),
                    source,
                })?;
            files.push((id, path));
        }
    }
    files.sort();
    Ok(files)
}

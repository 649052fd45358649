//! Volume template reading and validation.

use std::collections::{HashMap, HashSet};

use crate::errors::{VolplanError, VolplanResult};
use crate::volumes::{FsType, Volume};

use super::template::{ProductDefinition, VolumeTemplate};

/// Reads volume templates from a product definition and populates the
/// volumes a storage proposal starts from.
///
/// Outlines never validate their own fields, so every consistency check
/// lives here: this is the last point where the full template set is in
/// hand before the outlines become read-only solver input.
pub struct VolumeTemplatesReader {
    templates: Vec<VolumeTemplate>,
}

impl VolumeTemplatesReader {
    /// Create a reader over already-deserialized templates.
    pub fn new(templates: Vec<VolumeTemplate>) -> Self {
        Self { templates }
    }

    /// Create a reader from a product definition JSON document.
    pub fn from_json(json: &str) -> VolplanResult<Self> {
        let product: ProductDefinition = serde_json::from_str(json)?;
        tracing::debug!(
            "Read {} volume templates from product definition",
            product.volume_templates.len()
        );
        Ok(Self::new(product.volume_templates))
    }

    /// Validate the templates and build one [`Volume`] per template.
    pub fn read(&self) -> VolplanResult<Vec<Volume>> {
        self.validate()?;
        Ok(self.templates.iter().map(build_volume).collect())
    }

    fn validate(&self) -> VolplanResult<()> {
        let mut seen = HashSet::new();
        for template in &self.templates {
            validate_template(template)?;
            if !seen.insert(template.mount_path.as_str()) {
                return Err(VolplanError::Config(format!(
                    "duplicate volume template for '{}'",
                    template.mount_path
                )));
            }
        }

        self.validate_fallback_targets()?;
        self.validate_fallback_cycles()
    }

    /// Every fallback target must name a declared mount path other than
    /// the owner itself. A relation to an undeclared volume can never
    /// absorb anything.
    fn validate_fallback_targets(&self) -> VolplanResult<()> {
        let declared: HashSet<&str> = self
            .templates
            .iter()
            .map(|template| template.mount_path.as_str())
            .collect();

        for template in &self.templates {
            for target in fallback_targets(template) {
                if target == template.mount_path {
                    return Err(VolplanError::Config(format!(
                        "volume '{}' lists itself as a fallback target",
                        template.mount_path
                    )));
                }
                if !declared.contains(target) {
                    return Err(VolplanError::Config(format!(
                        "volume '{}' falls back for undeclared mount path '{}'",
                        template.mount_path, target
                    )));
                }
            }
        }
        Ok(())
    }

    /// Reject circular fallback relations (A absorbs B, B absorbs A).
    /// The solver assumes the relation graph is acyclic.
    fn validate_fallback_cycles(&self) -> VolplanResult<()> {
        let mut edges: HashMap<&str, Vec<&str>> = HashMap::new();
        for template in &self.templates {
            edges.insert(
                template.mount_path.as_str(),
                fallback_targets(template).collect(),
            );
        }

        let mut done: HashSet<&str> = HashSet::new();
        for template in &self.templates {
            let mut stack = Vec::new();
            if let Some(cycle) =
                find_cycle(template.mount_path.as_str(), &edges, &mut stack, &mut done)
            {
                return Err(VolplanError::Config(format!(
                    "fallback relations form a cycle: {}",
                    cycle.join(" -> ")
                )));
            }
        }
        Ok(())
    }
}

/// Convenience wrapper: deserialize, validate and build in one call.
pub fn read_volumes(json: &str) -> VolplanResult<Vec<Volume>> {
    VolumeTemplatesReader::from_json(json)?.read()
}

/// Both fallback lists of a template, in declaration order.
fn fallback_targets(template: &VolumeTemplate) -> impl Iterator<Item = &str> {
    template
        .outline
        .min_size_fallback_for
        .iter()
        .chain(template.outline.max_size_fallback_for.iter())
        .map(String::as_str)
}

fn validate_template(template: &VolumeTemplate) -> VolplanResult<()> {
    let outline = &template.outline;

    if template.mount_path.is_empty() {
        return Err(VolplanError::Config(
            "volume template without a mount path".to_string(),
        ));
    }

    // Unlimited max compares greater than everything, so this only
    // fires for a finite max below the min.
    if outline.base_max_size < outline.base_min_size {
        return Err(VolplanError::Config(format!(
            "volume '{}': max size {} is below min size {}",
            template.mount_path, outline.base_max_size, outline.base_min_size
        )));
    }

    // An empty filesystem list is only valid for volumes that are never
    // auto-created.
    if outline.filesystems.is_empty() && (outline.required || outline.adaptive_sizes()) {
        return Err(VolplanError::Config(format!(
            "volume '{}' needs at least one acceptable filesystem type",
            template.mount_path
        )));
    }

    if let Some(fs) = template.filesystem {
        if !outline.filesystems.is_empty() && !outline.filesystems.contains(&fs) {
            return Err(VolplanError::Config(format!(
                "filesystem {} is not acceptable for volume '{}'",
                fs, template.mount_path
            )));
        }
    }

    if outline.snapshots_affect_sizes()
        && !outline.filesystems.iter().any(FsType::supports_snapshots)
    {
        tracing::warn!(
            "Volume '{}' reserves snapshot space but none of its filesystems ({}) support snapshots",
            template.mount_path,
            outline
                .filesystems
                .iter()
                .map(FsType::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    Ok(())
}

fn build_volume(template: &VolumeTemplate) -> Volume {
    let mut volume = Volume::new(template.mount_path.clone(), template.outline.clone());
    if template.filesystem.is_some() {
        volume.fs_type = template.filesystem;
    }
    volume.mount_options = template.mount_options.clone();
    volume.snapshots = template.snapshots;

    tracing::debug!(
        "Volume '{}': fs {:?}, adaptive sizes: {}",
        volume.mount_path,
        volume.fs_type,
        volume.outline.adaptive_sizes()
    );
    volume
}

/// Depth-first walk over the fallback relation graph. Returns the cycle
/// path when `node` reaches a mount path already on the stack.
fn find_cycle<'a>(
    node: &'a str,
    edges: &HashMap<&'a str, Vec<&'a str>>,
    stack: &mut Vec<&'a str>,
    done: &mut HashSet<&'a str>,
) -> Option<Vec<String>> {
    if done.contains(node) {
        return None;
    }
    if let Some(pos) = stack.iter().position(|seen| *seen == node) {
        let mut cycle: Vec<String> = stack[pos..].iter().map(|s| s.to_string()).collect();
        cycle.push(node.to_string());
        return Some(cycle);
    }

    stack.push(node);
    for target in edges.get(node).into_iter().flatten().copied() {
        if let Some(cycle) = find_cycle(target, edges, stack, done) {
            return Some(cycle);
        }
    }
    stack.pop();
    done.insert(node);
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sizes::DiskSize;
    use crate::volumes::VolumeOutline;

    fn template(mount_path: &str, outline: VolumeOutline) -> VolumeTemplate {
        VolumeTemplate {
            mount_path: mount_path.to_string(),
            outline,
            ..Default::default()
        }
    }

    fn read(templates: Vec<VolumeTemplate>) -> VolplanResult<Vec<Volume>> {
        VolumeTemplatesReader::new(templates).read()
    }

    fn assert_config_error(result: VolplanResult<Vec<Volume>>, needle: &str) {
        match result {
            Err(VolplanError::Config(message)) => assert!(
                message.contains(needle),
                "expected '{}' in '{}'",
                needle,
                message
            ),
            other => panic!("expected a configuration error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_read_builds_one_volume_per_template() {
        let root = template(
            "/",
            VolumeOutline {
                required: true,
                filesystems: vec![FsType::Btrfs, FsType::Ext4],
                base_min_size: DiskSize::from_gib(5),
                ..Default::default()
            },
        );
        let home = template(
            "/home",
            VolumeOutline {
                filesystems: vec![FsType::Xfs],
                ..Default::default()
            },
        );

        let volumes = read(vec![root, home]).unwrap();
        assert_eq!(volumes.len(), 2);
        assert_eq!(volumes[0].mount_path, "/");
        assert_eq!(volumes[0].fs_type, Some(FsType::Btrfs));
        assert_eq!(volumes[1].mount_path, "/home");
    }

    #[test]
    fn test_template_filesystem_overrides_outline_default() {
        let mut root = template(
            "/",
            VolumeOutline {
                filesystems: vec![FsType::Btrfs, FsType::Ext4],
                ..Default::default()
            },
        );
        root.filesystem = Some(FsType::Ext4);

        let volumes = read(vec![root]).unwrap();
        assert_eq!(volumes[0].fs_type, Some(FsType::Ext4));
    }

    #[test]
    fn test_rejects_missing_mount_path() {
        let nameless = template("", VolumeOutline::default());
        assert_config_error(read(vec![nameless]), "without a mount path");
    }

    #[test]
    fn test_rejects_duplicate_mount_paths() {
        let outline = VolumeOutline {
            filesystems: vec![FsType::Ext4],
            ..Default::default()
        };
        let result = read(vec![template("/", outline.clone()), template("/", outline)]);
        assert_config_error(result, "duplicate volume template");
    }

    #[test]
    fn test_rejects_inverted_size_bounds() {
        let shrunk = template(
            "/",
            VolumeOutline {
                filesystems: vec![FsType::Ext4],
                base_min_size: DiskSize::from_gib(10),
                base_max_size: DiskSize::from_gib(5),
                ..Default::default()
            },
        );
        assert_config_error(read(vec![shrunk]), "below min size");
    }

    #[test]
    fn test_unlimited_max_is_never_inverted() {
        let unbounded = template(
            "/",
            VolumeOutline {
                filesystems: vec![FsType::Ext4],
                base_min_size: DiskSize::from_gib(10),
                base_max_size: DiskSize::UNLIMITED,
                ..Default::default()
            },
        );
        assert!(read(vec![unbounded]).is_ok());
    }

    #[test]
    fn test_rejects_required_volume_without_filesystems() {
        let bare = template(
            "/",
            VolumeOutline {
                required: true,
                ..Default::default()
            },
        );
        assert_config_error(read(vec![bare]), "at least one acceptable filesystem");
    }

    #[test]
    fn test_rejects_adaptive_volume_without_filesystems() {
        let bare = template(
            "/",
            VolumeOutline {
                adjust_by_ram: true,
                ..Default::default()
            },
        );
        assert_config_error(read(vec![bare]), "at least one acceptable filesystem");
    }

    #[test]
    fn test_allows_optional_fixed_volume_without_filesystems() {
        // Never auto-created: not required, nothing adaptive
        let optional = template("/extra", VolumeOutline::default());
        let volumes = read(vec![optional]).unwrap();
        assert_eq!(volumes[0].fs_type, None);
    }

    #[test]
    fn test_rejects_unacceptable_selected_filesystem() {
        let mut root = template(
            "/",
            VolumeOutline {
                filesystems: vec![FsType::Btrfs],
                ..Default::default()
            },
        );
        root.filesystem = Some(FsType::Xfs);
        assert_config_error(read(vec![root]), "not acceptable");
    }

    #[test]
    fn test_rejects_self_referential_fallback() {
        let selfish = template(
            "/",
            VolumeOutline {
                filesystems: vec![FsType::Ext4],
                min_size_fallback_for: vec!["/".to_string()],
                ..Default::default()
            },
        );
        assert_config_error(read(vec![selfish]), "lists itself");
    }

    #[test]
    fn test_rejects_dangling_fallback_target() {
        let root = template(
            "/",
            VolumeOutline {
                filesystems: vec![FsType::Ext4],
                max_size_fallback_for: vec!["/opt".to_string()],
                ..Default::default()
            },
        );
        assert_config_error(read(vec![root]), "undeclared mount path '/opt'");
    }

    #[test]
    fn test_rejects_fallback_cycle() {
        let root = template(
            "/",
            VolumeOutline {
                filesystems: vec![FsType::Ext4],
                min_size_fallback_for: vec!["/home".to_string()],
                ..Default::default()
            },
        );
        let home = template(
            "/home",
            VolumeOutline {
                filesystems: vec![FsType::Ext4],
                max_size_fallback_for: vec!["/".to_string()],
                ..Default::default()
            },
        );
        assert_config_error(read(vec![root, home]), "form a cycle");
    }

    #[test]
    fn test_accepts_acyclic_fallback_chain() {
        // / absorbs /home, /home absorbs /var: a chain, not a cycle
        let root = template(
            "/",
            VolumeOutline {
                filesystems: vec![FsType::Ext4],
                min_size_fallback_for: vec!["/home".to_string()],
                ..Default::default()
            },
        );
        let home = template(
            "/home",
            VolumeOutline {
                filesystems: vec![FsType::Ext4],
                min_size_fallback_for: vec!["/var".to_string()],
                ..Default::default()
            },
        );
        let var = template(
            "/var",
            VolumeOutline {
                filesystems: vec![FsType::Ext4],
                ..Default::default()
            },
        );
        assert!(read(vec![root, home, var]).is_ok());
    }

    #[test]
    fn test_diamond_relations_are_not_a_cycle() {
        // Two volumes absorbing the same third one is fine
        let outline_to_var = VolumeOutline {
            filesystems: vec![FsType::Ext4],
            min_size_fallback_for: vec!["/var".to_string()],
            ..Default::default()
        };
        let var = template(
            "/var",
            VolumeOutline {
                filesystems: vec![FsType::Ext4],
                ..Default::default()
            },
        );
        let result = read(vec![
            template("/", outline_to_var.clone()),
            template("/home", outline_to_var),
            var,
        ]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_from_json_reports_malformed_documents() {
        assert!(matches!(
            VolumeTemplatesReader::from_json("{ not json"),
            Err(VolplanError::Malformed(_))
        ));
    }
}

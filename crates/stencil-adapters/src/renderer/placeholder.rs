//! `{{ key }}` renderer over a whole template tree.

use std::path::Path;

use stencil_core::{
    application::ports::TemplateRenderer,
    domain::{
        Archetype, Context, DomainError, DomainValidator as validator, FileSpec, ParsedTemplate,
        ProjectStructure, RelativePath, TemplateContent, TemplateNode, placeholder,
    },
    error::StencilResult,
};
use tracing::{debug, instrument};

/// Renders paths and text bodies with [`placeholder::substitute`] semantics.
///
/// Rendering happens in two passes. The first parses every path and body
/// and checks every referenced key against the context; only if that
/// succeeds does the second pass produce output. A template with one bad
/// key therefore yields an error and an empty result, never half a tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderRenderer;

impl PlaceholderRenderer {
    pub fn new() -> Self {
        Self
    }
}

/// One node with its path and body already parsed.
struct Prepared<'a> {
    template_path: &'a str,
    path: ParsedTemplate,
    kind: Kind<'a>,
}

enum Kind<'a> {
    Directory,
    File { spec: &'a FileSpec, body: Body<'a> },
}

enum Body<'a> {
    Text(ParsedTemplate),
    Verbatim(&'a [u8]),
}

impl TemplateRenderer for PlaceholderRenderer {
    #[instrument(skip_all, fields(archetype = archetype.name(), nodes = archetype.tree.len()))]
    fn render(
        &self,
        archetype: &Archetype,
        context: &Context,
        output_root: &Path,
    ) -> StencilResult<ProjectStructure> {
        validator::validate_archetype(archetype)?;

        let prepared = prepare(archetype)?;
        check_keys(&prepared, context)?;

        let mut structure = ProjectStructure::new(output_root);
        for item in &prepared {
            let template_path = item.template_path;
            let rendered = item.path.render(context).map_err(|e| e.at(template_path))?;
            let path = rendered_path(template_path, &rendered)?;

            match &item.kind {
                Kind::Directory => structure.add_directory(path),
                Kind::File { spec, body } => {
                    let content = match body {
                        Body::Text(parsed) => parsed
                            .render(context)
                            .map_err(|e| e.at(template_path))?
                            .into_bytes(),
                        Body::Verbatim(bytes) => bytes.to_vec(),
                    };
                    debug!(template = template_path, path = %path, "Rendered file");
                    structure.add_file(path, content, spec.permissions);
                }
            }
        }

        validator::validate_project_structure(&structure)?;
        Ok(structure)
    }
}

/// Parse pass: every path, every text body.
fn prepare(archetype: &Archetype) -> StencilResult<Vec<Prepared<'_>>> {
    archetype
        .tree
        .iter()
        .map(|node| {
            let template_path = node.path();
            let parse = |source: &str| placeholder::parse(source).map_err(|e| e.at(template_path));

            let path = parse(template_path)?;
            let kind = match node {
                TemplateNode::Directory(_) => Kind::Directory,
                TemplateNode::File(spec) => Kind::File {
                    spec,
                    body: match &spec.content {
                        TemplateContent::Text(text) => Body::Text(parse(text)?),
                        TemplateContent::Verbatim(bytes) => Body::Verbatim(bytes),
                    },
                },
            };
            Ok(Prepared {
                template_path,
                path,
                kind,
            })
        })
        .collect()
}

/// First key the context lacks, in traversal order (path before body).
fn check_keys(prepared: &[Prepared<'_>], context: &Context) -> StencilResult<()> {
    for item in prepared {
        let missing = item.path.first_unresolved(context).or_else(|| match &item.kind {
            Kind::File {
                body: Body::Text(parsed),
                ..
            } => parsed.first_unresolved(context),
            _ => None,
        });
        if let Some(key) = missing {
            return Err(DomainError::UnresolvedPlaceholder {
                key: key.to_string(),
                path: item.template_path.to_string(),
            }
            .into());
        }
    }
    Ok(())
}

/// A rendered path must be relative, with no empty, `.` or `..` segments.
fn rendered_path(template: &str, rendered: &str) -> StencilResult<RelativePath> {
    let invalid = || DomainError::InvalidRenderedPath {
        template: template.to_string(),
        rendered: rendered.to_string(),
    };

    if rendered.is_empty() || rendered.contains('\\') {
        return Err(invalid().into());
    }
    if rendered
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(invalid().into());
    }

    RelativePath::try_new(rendered).map_err(|_| invalid().into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stencil_core::domain::{ArchetypeMetadata, DirectorySpec, FileSpec, PromptSpec};
    use stencil_core::error::StencilError;

    fn ctx() -> Context {
        [("prefix-name", "user"), ("suffix-name", "service"), ("PrefixName", "User")]
            .into_iter()
            .collect()
    }

    fn archetype(nodes: Vec<TemplateNode>) -> Archetype {
        nodes
            .into_iter()
            .fold(
                Archetype::builder()
                    .metadata(ArchetypeMetadata::new("t"))
                    .prompt(PromptSpec::new("Prefix", "prefix-name")),
                |b, n| b.add_node(n),
            )
            .build()
            .unwrap()
    }

    fn domain(err: StencilError) -> DomainError {
        match err {
            StencilError::Domain(e) => e,
            other => panic!("expected domain error, got {other:?}"),
        }
    }

    #[test]
    fn renders_paths_and_bodies() {
        let arch = archetype(vec![
            TemplateNode::Directory(DirectorySpec::new("{{ prefix-name }}-{{ suffix-name }}")),
            TemplateNode::File(FileSpec::text(
                "{{ prefix-name }}-{{ suffix-name }}/README.md",
                "# {{ PrefixName }}",
            )),
        ]);

        let out = PlaceholderRenderer::new()
            .render(&arch, &ctx(), Path::new("/out"))
            .unwrap();

        let file = out.files().next().unwrap();
        assert_eq!(file.path.to_string(), "user-service/README.md");
        assert_eq!(file.content, b"# User");
        assert_eq!(out.directories().count(), 1);
    }

    #[test]
    fn verbatim_content_is_untouched() {
        let bytes = vec![0x89, b'P', b'N', b'G', b'{', b'{'];
        let arch = archetype(vec![TemplateNode::File(FileSpec::new(
            "{{ prefix-name }}.png",
            TemplateContent::Verbatim(bytes.clone()),
        ))]);

        let out = PlaceholderRenderer::new()
            .render(&arch, &ctx(), Path::new("/out"))
            .unwrap();
        let file = out.files().next().unwrap();
        assert_eq!(file.path.to_string(), "user.png");
        assert_eq!(file.content, bytes);
    }

    #[test]
    fn only_text_bodies_are_checked_for_keys() {
        let arch = archetype(vec![
            TemplateNode::Directory(DirectorySpec::new("{{ prefix-name }}")),
            TemplateNode::File(FileSpec::new(
                "{{ prefix-name }}/raw.bin",
                TemplateContent::Verbatim(b"{{ not-a-key }}".to_vec()),
            )),
            TemplateNode::File(FileSpec::text("{{ prefix-name }}/a.txt", "{{ PrefixName }}")),
        ]);

        let out = PlaceholderRenderer::new()
            .render(&arch, &ctx(), Path::new("/out"))
            .unwrap();

        let files: Vec<_> = out.files().map(|f| (f.path.to_string(), f.content.clone())).collect();
        assert_eq!(
            files,
            vec![
                ("user/raw.bin".to_string(), b"{{ not-a-key }}".to_vec()),
                ("user/a.txt".to_string(), b"User".to_vec()),
            ]
        );
    }

    #[test]
    fn first_missing_key_in_traversal_order_is_reported() {
        let arch = archetype(vec![
            TemplateNode::File(FileSpec::text("a.txt", "{{ first-missing }}")),
            TemplateNode::File(FileSpec::text("{{ second-missing }}.txt", "")),
        ]);

        let err = domain(
            PlaceholderRenderer::new()
                .render(&arch, &ctx(), Path::new("/out"))
                .unwrap_err(),
        );
        assert_eq!(
            err,
            DomainError::UnresolvedPlaceholder {
                key: "first-missing".into(),
                path: "a.txt".into()
            }
        );
    }

    #[test]
    fn malformed_anywhere_fails_before_lookup() {
        let arch = archetype(vec![
            TemplateNode::File(FileSpec::text("a.txt", "{{ missing }}")),
            TemplateNode::File(FileSpec::text("b.txt", "{{ oops")),
        ]);

        let err = domain(
            PlaceholderRenderer::new()
                .render(&arch, &ctx(), Path::new("/out"))
                .unwrap_err(),
        );
        assert!(matches!(err, DomainError::MalformedPlaceholder { path, .. } if path == "b.txt"));
    }

    #[test]
    fn colliding_rendered_paths_conflict() {
        let arch = archetype(vec![
            TemplateNode::File(FileSpec::text("{{ prefix-name }}.txt", "a")),
            TemplateNode::File(FileSpec::text("user.txt", "b")),
        ]);

        let err = domain(
            PlaceholderRenderer::new()
                .render(&arch, &ctx(), Path::new("/out"))
                .unwrap_err(),
        );
        assert_eq!(
            err,
            DomainError::DestinationConflict {
                path: "user.txt".into()
            }
        );
    }

    #[test]
    fn values_cannot_escape_the_destination() {
        let evil: Context = [("prefix-name", "../etc")].into_iter().collect();
        let arch = archetype(vec![TemplateNode::File(FileSpec::text(
            "{{ prefix-name }}/passwd",
            "",
        ))]);

        let err = domain(
            PlaceholderRenderer::new()
                .render(&arch, &evil, Path::new("/out"))
                .unwrap_err(),
        );
        assert!(matches!(err, DomainError::InvalidRenderedPath { .. }));
    }

    #[test]
    fn empty_value_producing_empty_segment_is_rejected() {
        let blank: Context = [("prefix-name", "")].into_iter().collect();
        let arch = archetype(vec![TemplateNode::File(FileSpec::text(
            "{{ prefix-name }}/x.txt",
            "",
        ))]);

        assert!(
            PlaceholderRenderer::new()
                .render(&arch, &blank, Path::new("/out"))
                .is_err()
        );
    }

    #[test]
    fn rendering_is_idempotent() {
        let arch = archetype(vec![TemplateNode::File(FileSpec::text(
            "{{ prefix-name }}/x.txt",
            "{{ PrefixName }} {{'{'}}",
        ))]);
        let r = PlaceholderRenderer::new();
        assert_eq!(
            r.render(&arch, &ctx(), Path::new("/out")).unwrap(),
            r.render(&arch, &ctx(), Path::new("/out")).unwrap()
        );
    }
}

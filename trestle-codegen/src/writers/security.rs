//! The security artifact: per-scheme middleware scaffolding.
//!
//! Emitted only when the design declares at least one security scheme; the
//! orchestrator skips this writer otherwise.

use trestle_core::to_snake_case;
use trestle_design::{LinkedApi, SchemeKind, SecurityScheme};

use crate::ast::{Fn, Param};
use crate::error::GenerationError;
use crate::naming::Names;
use crate::rust_file::RustFile;

use super::{Artifact, header, literal};

/// Writer for `security.rs`.
pub struct SecurityFile;

impl Artifact for SecurityFile {
    fn file_name(&self) -> &'static str {
        "security.rs"
    }

    fn render(&self, api: &LinkedApi, names: &mut Names) -> Result<String, GenerationError> {
        let mut file = RustFile::new();
        for scheme in api.security_schemes.values() {
            file = file.add(scheme_fn(scheme, names)?.build());
            file = file.add(middleware_fn(scheme, names)?.build());
        }
        Ok(file.render_with_header(&header(api, "application security")))
    }
}

/// The runtime descriptor constructor for one scheme.
fn scheme_fn(scheme: &SecurityScheme, names: &mut Names) -> Result<Fn, GenerationError> {
    let fn_name = format!("new_{}_security", to_snake_case(&scheme.name));
    names.claim(&fn_name, &format!("security scheme '{}'", scheme.name))?;

    let name_lit = literal(&scheme.name);
    let constructor = match &scheme.kind {
        SchemeKind::ApiKey { header } => format!(
            "trestle_runtime::security::Scheme::api_key({name_lit}, {})",
            literal(header)
        ),
        SchemeKind::Basic => format!("trestle_runtime::security::Scheme::basic({name_lit})"),
        SchemeKind::Jwt { token_url } => format!(
            "trestle_runtime::security::Scheme::jwt({name_lit}, {})",
            literal(token_url)
        ),
        SchemeKind::OAuth2 {
            authorization_url,
            token_url,
            scopes,
        } => {
            let scope_pairs = scopes
                .iter()
                .map(|(name, desc)| format!("({}, {})", literal(name), literal(desc)))
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "trestle_runtime::security::Scheme::oauth2({name_lit}, {}, {}, &[{scope_pairs}])",
                literal(authorization_url),
                literal(token_url)
            )
        }
    };

    Ok(Fn::new(fn_name)
        .doc(format!(
            "Runtime definition of the '{}' {} scheme.",
            scheme.name,
            scheme.kind.label()
        ))
        .returns("trestle_runtime::security::Scheme")
        .body_line(constructor))
}

/// The middleware mount for one scheme; the middleware runs before every
/// handler the scheme protects.
fn middleware_fn(scheme: &SecurityScheme, names: &mut Names) -> Result<Fn, GenerationError> {
    let fn_name = format!("use_{}_middleware", to_snake_case(&scheme.name));
    names.claim(&fn_name, &format!("security scheme '{}'", scheme.name))?;
    let scheme_fn = format!("new_{}_security", to_snake_case(&scheme.name));

    Ok(Fn::new(fn_name)
        .doc(format!(
            "Mount the '{}' scheme middleware onto the service.",
            scheme.name
        ))
        .param(Param::new("service", "&mut trestle_runtime::Service"))
        .param(Param::new("middleware", "trestle_runtime::Middleware"))
        .body_line(format!(
            "service.register_security({scheme_fn}(), middleware);"
        )))
}

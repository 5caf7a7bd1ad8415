//! The tests artifact: per-response helpers that mount the controller,
//! dispatch a request, and assert the declared status.

use std::collections::BTreeSet;

use trestle_core::to_snake_case;
use trestle_design::{LinkedApi, LinkedResource};

use crate::ast::{Fn, Param};
use crate::error::GenerationError;
use crate::naming::Names;
use crate::rust_file::{RustFile, Use};

use super::{Artifact, header};

/// Writer for `tests.rs`.
pub struct TestsFile;

impl Artifact for TestsFile {
    fn file_name(&self) -> &'static str {
        "tests.rs"
    }

    fn render(&self, api: &LinkedApi, names: &mut Names) -> Result<String, GenerationError> {
        let mut file = RustFile::new();
        let mut controller_uses = BTreeSet::new();
        let mut chunks = Vec::new();

        for resource in api.resources.values() {
            if resource.actions.is_empty() {
                continue;
            }
            let controller = names.controller(&resource.name)?;
            controller_uses.insert(controller.clone());
            controller_uses.insert("init_service".to_string());
            controller_uses.insert(format!("mount_{}_controller", to_snake_case(&resource.name)));
            for action in resource.actions.values() {
                for response in action.success_responses() {
                    let helper =
                        names.test_helper(&action.name, &resource.name, &response.name)?;
                    chunks.push(
                        helper_fn(&helper, &controller, resource, &action.name, &response.name, response.status)
                            .build(),
                    );
                }
            }
        }

        if !controller_uses.is_empty() {
            file = file.use_stmt(Use::new("super::controllers").symbols(controller_uses));
        }
        for chunk in chunks {
            file = file.add(chunk);
        }
        Ok(file.render_with_header(&header(api, "resource test helpers")))
    }
}

fn helper_fn(
    helper: &str,
    controller: &str,
    resource: &LinkedResource,
    action: &str,
    response: &str,
    status: u16,
) -> Fn {
    let mount = format!("mount_{}_controller", to_snake_case(&resource.name));
    Fn::new(helper)
        .doc(format!(
            "Run the {action} action of the {} resource and assert the '{response}' status.",
            resource.name
        ))
        .generic("C")
        .param(Param::new("ctrl", "std::sync::Arc<C>"))
        .param(Param::new("req", "&trestle_runtime::Request"))
        .returns("trestle_runtime::Response")
        .where_bound(format!("C: {controller} + Send + Sync + 'static"))
        .body(format!(
            "let mut service = trestle_runtime::Service::new(\"test\");\n\
             init_service(&mut service);\n\
             {mount}(&mut service, ctrl);\n\
             let resp = service.dispatch(req);\n\
             assert_eq!(resp.status(), {status}, \"{action} {}: unexpected status for '{response}'\");\n\
             resp",
            resource.name
        ))
}

use std::collections::BTreeMap;

use serde::Serialize;
use tether_store::{EnvironmentStore, YamlWorkspaceStore};

use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::{OutputArgs, WorkspaceArgs};

#[derive(Serialize)]
struct EnvironmentSummary {
    id: String,
    name: String,
    values: usize,
}

#[derive(Serialize)]
struct EnvironmentValues {
    id: String,
    name: String,
    values: BTreeMap<String, String>,
}

pub async fn env_cmd(environment_id: Option<&str>, workspace: WorkspaceArgs, output: OutputArgs) -> i32 {
    let store = match YamlWorkspaceStore::open(&workspace.workspace).await {
        Ok(s) => s,
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::RUNTIME_ERROR;
        }
    };

    let Some(id) = environment_id else {
        let list: Vec<EnvironmentSummary> = store
            .list_environments()
            .await
            .into_iter()
            .map(|e| EnvironmentSummary {
                values: e.values.len(),
                id: e.meta.id,
                name: e.meta.name,
            })
            .collect();
        if output.format == OutputFormat::Text && !output.quiet {
            for e in &list {
                println!("{}\t{}\t{} values", e.id, e.name, e.values);
            }
        } else {
            print_result(output.format, output.quiet, &list);
        }
        return exit_codes::SUCCESS;
    };

    let Some(env) = store.get_environment(id).await else {
        print_error(
            output.format,
            output.quiet,
            &format!("environment with id {id} not found"),
        );
        return exit_codes::RUNTIME_ERROR;
    };

    let result = EnvironmentValues {
        values: env.enabled_values(),
        id: env.meta.id,
        name: env.meta.name,
    };
    if output.format == OutputFormat::Text && !output.quiet {
        for (k, v) in &result.values {
            println!("{k}={v}");
        }
    } else {
        print_result(output.format, output.quiet, &result);
    }
    exit_codes::SUCCESS
}

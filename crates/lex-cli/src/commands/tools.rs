use lex_core::LlmResult;
use lex_search::ToolDefinition;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ToolsArgs;
use crate::output;

#[derive(Serialize)]
struct Catalogue {
    tools: Vec<ToolDefinition>,
    output: schemars::Schema,
}

/// Handle `lexa tools`. Always JSON: the catalogue is meant for an LLM driver.
pub fn handle(args: &ToolsArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let tools = lex_search::tool_definitions()?;
    if args.with_output_schema {
        let catalogue = Catalogue {
            tools,
            output: schemars::schema_for!(LlmResult),
        };
        return output::output(&catalogue, flags.format);
    }
    output::output(&tools, flags.format)
}

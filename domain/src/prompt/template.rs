//! Prompt templates for routing, decomposition, synthesis and recovery

use crate::source::id::SourceId;
use crate::source::maps::AnswerMap;
use crate::source::registry::{NO_SOURCE_SENTINEL, SourceRegistry};
use std::collections::BTreeSet;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for source selection
    pub fn selector_system(registry: &SourceRegistry) -> String {
        let community = registry.community_id();
        let package_count = registry.package_ids().count();

        let mut datasets = String::new();
        for source in registry.packages() {
            datasets.push_str(&format!(
                "- {} (from the `{}` GitHub repo): {}\n",
                source.id, source.display_name, source.description
            ));
        }
        if let Some(site) = registry.get(community) {
            datasets.push_str(&format!(
                "- {} (from the {} website's GitHub repo): {}\n",
                community, site.display_name, site.description
            ));
        }

        format!(
            r#"You are the source selector of PyHC-Chat, an assistant built by the Python in Heliophysics Community (PyHC) to answer questions about PyHC and its {package_count} core Python packages.

The assistant's own knowledge may be outdated, so it can retrieve the latest documentation and source code from these datasets:
{datasets}
Decide which datasets, if any, are needed to answer the user's latest message:
- If the question is about the community itself (meetings, events, standards, general activities), respond with "{community}".
- If the question might benefit from the latest code or documentation of one or more packages, respond with those dataset names.
- If the question follows up on the previous answer, prefer the datasets that answer was based on.
- If no retrieval is needed, respond with "{NO_SOURCE_SENTINEL}".

Every retrieval adds delay, and irrelevant context can derail the answer. Retrieve only when it helps.

Respond with a comma-separated list of dataset names and nothing else, e.g. "sunpy, pysat", or just "{NO_SOURCE_SENTINEL}"."#
        )
    }

    /// System prompt for query decomposition over a fixed source set
    pub fn decomposer_system(sources: &BTreeSet<SourceId>, registry: &SourceRegistry) -> String {
        let names = join(sources);
        let mut context = String::new();
        for id in sources {
            if let Some(source) = registry.get(id) {
                context.push_str(&format!("- {}: {}\n", id, source.description));
            }
        }

        format!(
            r#"You direct questions to expert helper bots, one per Python package.

The user's latest message relates to these packages:
{context}
For each of {names}, write one concise, targeted question for that package's helper bot. Each question must stand on its own and gather the context needed to answer the user's latest message.

Respond with exactly one line per package and nothing else:
<package>: <question for that package>"#
        )
    }

    /// Assistant persona prepended to every synthesis request
    pub fn persona_system(registry: &SourceRegistry) -> String {
        let packages: Vec<&str> = registry
            .packages()
            .map(|s| s.display_name.as_str())
            .collect();
        let count = packages.len();
        let core = join_natural(&packages);

        let mut prompt = format!(
            r#"You are PyHC-Chat, an assistant built by the Python in Heliophysics Community (PyHC) to discuss PyHC and its {count} core packages: {core}.

Your background knowledge of these packages may be outdated. When up-to-date context retrieved from the packages' repositories is provided, prefer it."#
        );

        if !registry.other_packages().is_empty() {
            prompt.push_str(&format!(
                "\n\nIf asked to name every PyHC package, the other non-core packages under PyHC's umbrella are: {}.",
                registry.other_packages().join(", ")
            ));
        }

        prompt
    }

    /// User prompt carrying retrieved per-source answers
    pub fn synthesis_with_context(query: &str, answers: &AnswerMap) -> String {
        let mut statements = String::new();
        for (i, (id, answer)) in answers.iter().enumerate() {
            statements.push_str(&format!("{}. (from {}): `{}`\n\n", i + 1, id, answer));
        }

        format!(
            r#"To best address the user's inquiry, use the information below, retrieved from the relevant repositories.

User's inquiry:
"{query}"

Retrieved details:
--
{statements}--

If any detail says specific information is missing, account for that in your answer without quoting it. Give one informative, seamless answer and do not mention that it was assembled from separate sources, even if part of the inquiry cannot be fully addressed."#
        )
    }

    /// Reformatting instruction for the source-set shape
    pub fn recovery_set_instruction(registry: &SourceRegistry) -> String {
        let names = join(registry.ids());
        format!(
            r#"The text below should be a comma-separated list of names drawn only from: {names} (or just "{NO_SOURCE_SENTINEL}").
It may contain more than the list (brackets, quotes, extra sentences), in which case extract the list, or none of the names, in which case answer "{NO_SOURCE_SENTINEL}".

Respond with the bare list and nothing else. For example, "['hapiclient', 'sunpy']" is WRONG and "hapiclient, sunpy" is correct."#
        )
    }

    /// Reformatting instruction for the question-map shape
    pub fn recovery_map_instruction(required: &BTreeSet<SourceId>) -> String {
        let names = join(required);
        format!(
            r#"The text below should contain one question per package for exactly these packages: {names}.
The formatting may vary. Rewrite it as exactly one line per package, using only those package names, and nothing else:
<package>: <question>

For example, given
"Questions -> hapiclient = What is HAPI?; pysat - How does pysat work?"
respond with
hapiclient: What is HAPI?
pysat: How does pysat work?"#
        )
    }

    /// Wrap the raw text handed to a reformatting call
    pub fn recovery_input(raw: &str) -> String {
        format!("Here is the text:\n\n\"{}\"", raw)
    }
}

fn join<'a>(ids: impl IntoIterator<Item = &'a SourceId>) -> String {
    ids.into_iter()
        .map(SourceId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// "a, b, and c"
fn join_natural(items: &[&str]) -> String {
    match items {
        [] => String::new(),
        [one] => one.to_string(),
        [init @ .., last] => format!("{}, and {}", init.join(", "), last),
    }
}

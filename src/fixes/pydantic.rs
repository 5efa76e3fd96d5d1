//! WebUI API models vs the pydantic v1/v2 split.
//!
//! The WebUI's `modules/api/models.py` mutates `DynamicModel.__config__`,
//! an API pydantic v2 removed. Preferred fix: pin pydantic back to v1.
//! Fallback when the pin can't be installed: patch the file to tolerate
//! both APIs. The patch is exact-substring and version-specific; a drifted
//! WebUI reports pattern-not-found rather than guessing.

use crate::concern::{Concern, FixContext, RecoveryAction};
use crate::error::Result;
use crate::patch::{PatchOutcome, SourcePatch};
use crate::pip::{Constraint, PackageSpec};

use super::install_or_fail;

const PYDANTIC_V1_PIN: &str = "pydantic>=1.10.0,<2.0.0";

const PATCH_FIND: &str = r#"        DynamicModel = create_model(self._model_name, **fields)
        DynamicModel.__config__.allow_population_by_field_name = True
        DynamicModel.__config__.allow_mutation = True
        return DynamicModel"#;

const PATCH_REPLACE: &str = r#"        DynamicModel = create_model(self._model_name, **fields)

        # Handle pydantic v1/v2 compatibility: __config__ became model_config in v2
        try:
            DynamicModel.__config__.allow_population_by_field_name = True
            DynamicModel.__config__.allow_mutation = True
        except AttributeError:
            from pydantic import ConfigDict
            DynamicModel.model_config = ConfigDict(populate_by_name=True)
        return DynamicModel"#;

/// The in-place patch applied to `modules/api/models.py`.
pub fn models_patch() -> SourcePatch {
    SourcePatch {
        file: "modules/api/models.py".to_string(),
        find: PATCH_FIND.to_string(),
        replace: PATCH_REPLACE.to_string(),
        marker: "Handle pydantic v1/v2 compatibility".to_string(),
    }
}

fn pydantic_is_v2(ctx: &mut FixContext) -> Result<bool> {
    Ok(ctx
        .env
        .installed_version("pydantic")?
        .is_some_and(|v| !Constraint::parse("<2.0.0").matches(&v)))
}

/// Build the `pydantic-api-compat` concern.
pub fn concern() -> Concern {
    Concern::new(
        "pydantic-api-compat",
        "WebUI API models incompatible with pydantic v2",
        "Pins pydantic back to v1; failing that, patches modules/api/models.py \
         to tolerate both APIs",
    )
    .action(
        RecoveryAction::new("pin-pydantic-v1", "reinstall pydantic 1.10.x")
            .predicate(pydantic_is_v2)
            .effect(|ctx| install_or_fail(ctx, &PackageSpec::new(PYDANTIC_V1_PIN)))
            .verify(|ctx| Ok(!pydantic_is_v2(ctx)?)),
    )
    .action(
        RecoveryAction::new("patch-api-models", "make models.py tolerate both APIs")
            .predicate(|ctx| Ok(pydantic_is_v2(ctx)? && !models_patch().is_applied(ctx.root)))
            .effect(|ctx| match models_patch().apply(ctx.root)? {
                PatchOutcome::Applied { .. } | PatchOutcome::AlreadyApplied => Ok(()),
                PatchOutcome::TargetMissing => {
                    Err(anyhow::anyhow!("modules/api/models.py not found under install root").into())
                }
                PatchOutcome::PatternNotFound => Err(anyhow::anyhow!(
                    "models.py does not match the expected WebUI version; not patching blind"
                )
                .into()),
            })
            .verify(|ctx| Ok(models_patch().is_applied(ctx.root))),
    )
}

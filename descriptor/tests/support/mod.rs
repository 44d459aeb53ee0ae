//! Form types shared by the descriptor integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use form_options_core::{
    DataProducer, FormContext, FormType, FormTypeExtension, OptionSchema, OptionValue,
    OptionsError, ResolvedType, TypeTag,
};
use form_options_descriptor::Registry;
use indexmap::IndexMap;

pub struct BaseFormType;

impl FormType for BaseFormType {
    fn name(&self) -> &str {
        "FormType"
    }

    fn configure_options(&self, schema: &mut OptionSchema) {
        schema
            .set_default("compound", true)
            .set_default("data_class", OptionValue::Null)
            .set_default_lazy("empty_data", |options| {
                let compound = options.get("compound")?.as_bool().unwrap_or(true);
                Ok(OptionValue::Callable(DataProducer::new(move |_| {
                    if compound {
                        OptionValue::List(vec![])
                    } else {
                        OptionValue::from("")
                    }
                })))
            })
            .set_default("required", true)
            .set_default("label", OptionValue::Null)
            .set_default("attr", OptionValue::Map(IndexMap::new()))
            .set_default("translation_domain", OptionValue::Null)
            .set_allowed_types("compound", &[TypeTag::Bool])
            .set_allowed_types("data_class", &[TypeTag::Null, TypeTag::String])
            .set_allowed_types("label", &[TypeTag::Null, TypeTag::String, TypeTag::Bool])
            .set_allowed_types("attr", &[TypeTag::Array])
            .set_allowed_types(
                "translation_domain",
                &[TypeTag::Null, TypeTag::String, TypeTag::Bool],
            );
    }
}

pub struct ChoiceType;

impl FormType for ChoiceType {
    fn name(&self) -> &str {
        "ChoiceType"
    }

    fn configure_options(&self, schema: &mut OptionSchema) {
        schema
            .set_default("choices", OptionValue::List(vec![]))
            .set_default("multiple", false)
            .set_default("expanded", false)
            .set_default("choice_translation_domain", true)
            .set_default_lazy("compound", |options| options.get("expanded"))
            .set_default_lazy("empty_data", |options| {
                let multiple = options.get("multiple")?.as_bool().unwrap_or(false);
                let expanded = options.get("expanded")?.as_bool().unwrap_or(false);
                Ok(if multiple {
                    OptionValue::List(vec![])
                } else if expanded {
                    OptionValue::Null
                } else {
                    OptionValue::from("")
                })
            })
            .set_allowed_types("choices", &[TypeTag::Array])
            .set_allowed_types("multiple", &[TypeTag::Bool])
            .set_allowed_types("expanded", &[TypeTag::Bool])
            .set_allowed_types(
                "choice_translation_domain",
                &[TypeTag::Null, TypeTag::Bool, TypeTag::String],
            )
            .set_info(
                "choice_translation_domain",
                "Translation domain of the choice labels",
            )
            .set_normalizer("choice_translation_domain", |options, value| {
                if value == OptionValue::Bool(true) {
                    options.get("translation_domain")
                } else {
                    Ok(value)
                }
            });
    }
}

pub struct FooType;

impl FormType for FooType {
    fn name(&self) -> &str {
        "FooType"
    }

    fn configure_options(&self, schema: &mut OptionSchema) {
        schema
            .set_required("foo")
            .set_default_chained("empty_data", |options, _previous| {
                let foo = options.get("foo")?;
                Ok(OptionValue::Callable(DataProducer::new(move |form: &FormContext| {
                    if form.compound {
                        OptionValue::List(vec![foo.clone()])
                    } else {
                        foo.clone()
                    }
                })))
            })
            .set_allowed_types("foo", &[TypeTag::String])
            .set_allowed_values("foo", ["bar", "baz"])
            .set_normalizer("foo", |_, value| {
                value
                    .cast_to_string()
                    .map(OptionValue::from)
                    .ok_or_else(|| OptionsError::Normalization {
                        option: "foo".to_string(),
                        message: "value has no string form".to_string(),
                    })
            });
    }
}

pub struct CsrfExtension;

impl FormTypeExtension for CsrfExtension {
    fn name(&self) -> &str {
        "FormTypeCsrfExtension"
    }

    fn configure_options(&self, schema: &mut OptionSchema) {
        schema
            .set_default("csrf_protection", true)
            .set_default("csrf_field_name", "_token")
            .set_default("csrf_token_id", OptionValue::Null)
            .set_allowed_types("csrf_protection", &[TypeTag::Bool]);
    }
}

pub fn form_type() -> Arc<ResolvedType> {
    Arc::new(ResolvedType::new(Arc::new(BaseFormType), vec![], None).unwrap())
}

pub fn form_type_with_csrf() -> Arc<ResolvedType> {
    Arc::new(ResolvedType::new(Arc::new(BaseFormType), vec![Arc::new(CsrfExtension)], None).unwrap())
}

pub fn child_of(inner: Arc<dyn FormType>, parent: Arc<ResolvedType>) -> ResolvedType {
    ResolvedType::new(inner, vec![], Some(parent)).unwrap()
}

pub fn registry() -> Registry {
    Registry {
        core_types: vec!["core::FormType".to_string(), "core::ChoiceType".to_string()],
        service_types: vec!["doctrine::EntityType".to_string()],
        extensions: vec!["csrf::FormTypeCsrfExtension".to_string()],
        guessers: vec!["validator::ValidatorTypeGuesser".to_string()],
    }
}

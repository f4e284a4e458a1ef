//! Query parameters: `form` style for scalars, `deepObject` style for nested objects.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use url::form_urlencoded;

use crate::binding::ParamError;

/// Declaration of a `form` style query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormParam {
    pub name: &'static str,
    pub required: bool,
    pub explode: bool,
}

impl FormParam {
    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            required: false,
            explode: true,
        }
    }

    #[cfg(test)]
    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    /// Values may arrive comma-separated in a single argument.
    #[cfg(test)]
    pub const fn unexploded(self) -> Self {
        Self {
            explode: false,
            ..self
        }
    }
}

/// Decoded query string, in arrival order.
#[derive(Debug, Default, Clone)]
pub struct QueryArgs {
    pairs: Vec<(String, String)>,
}

impl QueryArgs {
    pub fn parse(query: Option<&str>) -> Self {
        let pairs = query
            .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        Self { pairs }
    }

    fn values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Binds a scalar `form` parameter. Absent optional parameters resolve to `None`.
    pub fn form<T>(&self, param: &FormParam) -> Result<Option<T>, ParamError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let values: Vec<&str> = if param.explode {
            self.values(param.name).collect()
        } else {
            self.values(param.name).flat_map(|v| v.split(',')).collect()
        };

        match values.as_slice() {
            [] if param.required => Err(ParamError::Required { param: param.name }),
            [] => Ok(None),
            [value] => value
                .parse::<T>()
                .map(Some)
                .map_err(|e| ParamError::invalid(param.name, e)),
            _ => Err(ParamError::TooManyValues {
                param: param.name,
                count: values.len(),
            }),
        }
    }

    /// Collects `name[field]=value` arguments. Returns `None` when none are present.
    pub fn deep_object(&self, name: &'static str) -> Result<Option<DeepObject>, ParamError> {
        let mut fields = BTreeMap::new();

        for (key, value) in &self.pairs {
            let Some(rest) = key.strip_prefix(name) else {
                continue;
            };
            if rest.is_empty() {
                return Err(ParamError::invalid(
                    name,
                    "deepObject parameters must be sent as name[field]=value",
                ));
            }
            if !rest.starts_with('[') {
                // A different parameter that shares the prefix.
                continue;
            }

            let field = rest
                .strip_prefix('[')
                .and_then(|r| r.strip_suffix(']'))
                .filter(|f| !f.is_empty() && !f.contains(['[', ']']))
                .ok_or_else(|| ParamError::invalid(name, format!("malformed key '{key}'")))?;

            if fields.insert(field.to_owned(), value.clone()).is_some() {
                return Err(ParamError::invalid(
                    name,
                    format!("expected one value for {name}[{field}]"),
                ));
            }
        }

        Ok((!fields.is_empty()).then_some(DeepObject {
            param: name,
            fields,
        }))
    }
}

/// The fields of one `deepObject` parameter.
#[derive(Debug, Clone)]
pub struct DeepObject {
    param: &'static str,
    fields: BTreeMap<String, String>,
}

impl DeepObject {
    pub fn field<T>(&self, key: &str) -> Result<Option<T>, ParamError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.fields
            .get(key)
            .map(|raw| {
                raw.parse::<T>()
                    .map_err(|e| ParamError::invalid(self.param, format!("{key}: {e}")))
            })
            .transpose()
    }

    pub fn deny_unknown(&self, known: &[&str]) -> Result<(), ParamError> {
        match self.fields.keys().find(|k| !known.contains(&k.as_str())) {
            Some(unknown) => Err(ParamError::invalid(
                self.param,
                format!("unknown field '{unknown}'"),
            )),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: FormParam = FormParam::optional("limit");

    #[test]
    fn test_form_absent_optional_is_none() {
        let args = QueryArgs::parse(None);
        assert_eq!(args.form::<i32>(&LIMIT).unwrap(), None);
    }

    #[test]
    fn test_form_absent_required_fails() {
        let args = QueryArgs::parse(Some("other=1"));
        let err = args.form::<i32>(&LIMIT.required()).unwrap_err();
        assert_eq!(err, ParamError::Required { param: "limit" });
    }

    #[test]
    fn test_form_parses_scalar() {
        let args = QueryArgs::parse(Some("limit=25&cursor=abc"));
        assert_eq!(args.form::<i32>(&LIMIT).unwrap(), Some(25));
    }

    #[test]
    fn test_form_rejects_wrong_type() {
        let args = QueryArgs::parse(Some("limit=ten"));
        let err = args.form::<i32>(&LIMIT).unwrap_err();
        assert_eq!(err.param(), "limit");
    }

    #[test]
    fn test_form_rejects_repeated_values() {
        let args = QueryArgs::parse(Some("limit=1&limit=2"));
        let err = args.form::<i32>(&LIMIT).unwrap_err();
        assert_eq!(err, ParamError::TooManyValues { param: "limit", count: 2 });
    }

    #[test]
    fn test_form_unexploded_splits_commas() {
        let args = QueryArgs::parse(Some("limit=1,2"));
        assert_eq!(args.form::<String>(&LIMIT).unwrap().as_deref(), Some("1,2"));
        let err = args.form::<String>(&LIMIT.unexploded()).unwrap_err();
        assert_eq!(err, ParamError::TooManyValues { param: "limit", count: 2 });
    }

    #[test]
    fn test_form_decodes_escapes() {
        let args = QueryArgs::parse(Some("activity=dog%20walk"));
        let activity = args.form::<String>(&FormParam::optional("activity")).unwrap();
        assert_eq!(activity.as_deref(), Some("dog walk"));
    }

    #[test]
    fn test_deep_object_collects_fields() {
        let args = QueryArgs::parse(Some("pets%5Bage_above%5D=2&pets[species]=cat,dog&limit=3"));
        let pets = args.deep_object("pets").unwrap().unwrap();
        assert_eq!(pets.field::<i32>("age_above").unwrap(), Some(2));
        assert_eq!(pets.field::<i32>("age_below").unwrap(), None);
        assert_eq!(pets.field::<String>("species").unwrap().as_deref(), Some("cat,dog"));
    }

    #[test]
    fn test_deep_object_absent_is_none() {
        let args = QueryArgs::parse(Some("petsitter=1"));
        assert!(args.deep_object("pets").unwrap().is_none());
    }

    #[test]
    fn test_deep_object_rejects_bare_name() {
        let args = QueryArgs::parse(Some("pets=2"));
        assert_eq!(args.deep_object("pets").unwrap_err().param(), "pets");
    }

    #[test]
    fn test_deep_object_rejects_nested_keys() {
        let args = QueryArgs::parse(Some("pets[age][min]=2"));
        assert!(args.deep_object("pets").is_err());
    }

    #[test]
    fn test_deep_object_rejects_duplicate_fields() {
        let args = QueryArgs::parse(Some("pets[age_above]=2&pets[age_above]=3"));
        assert!(args.deep_object("pets").is_err());
    }

    #[test]
    fn test_deep_object_field_type_error_names_parameter() {
        let args = QueryArgs::parse(Some("pets[age_above]=old"));
        let pets = args.deep_object("pets").unwrap().unwrap();
        let err = pets.field::<i32>("age_above").unwrap_err();
        assert_eq!(err.param(), "pets");
        assert!(err.to_string().contains("age_above"));
    }

    #[test]
    fn test_deep_object_deny_unknown() {
        let args = QueryArgs::parse(Some("pets[colour]=black"));
        let pets = args.deep_object("pets").unwrap().unwrap();
        assert!(pets.deny_unknown(&["age_above", "species"]).is_err());
    }
}

//! Power domains.

use ipx_model::{ExpressionParser, PowerDomain};

use crate::helpers::has_valid_name;
use crate::validators::parameter::ParameterValidator;
use crate::Validator;

/// Checks a power domain against its sibling domains.
pub struct PowerDomainValidator<'a> {
    parser: &'a dyn ExpressionParser,
    domains: &'a [PowerDomain],
}

impl<'a> PowerDomainValidator<'a> {
    /// Creates a validator resolving `sub_domain_of` among `domains`.
    pub fn new(parser: &'a dyn ExpressionParser, domains: &'a [PowerDomain]) -> Self {
        Self { parser, domains }
    }

    fn has_valid_always_on(&self, domain: &PowerDomain) -> bool {
        domain.always_on.is_empty()
            || matches!(self.parser.resolve_u64(&domain.always_on), Some(0) | Some(1))
    }

    fn has_valid_parent(&self, domain: &PowerDomain) -> bool {
        match &domain.sub_domain_of {
            None => true,
            Some(parent) => {
                *parent != domain.name && self.domains.iter().any(|d| d.name == *parent)
            }
        }
    }
}

impl Validator<PowerDomain> for PowerDomainValidator<'_> {
    fn find_errors_in(&self, errors: &mut Vec<String>, domain: &PowerDomain, context: &str) {
        let name = &domain.name;
        if !has_valid_name(name) {
            errors.push(format!(
                "Invalid name specified for power domain {name} within {context}"
            ));
        }
        if !self.has_valid_always_on(domain) {
            errors.push(format!(
                "Invalid always on set for power domain {name} within {context}"
            ));
        }
        if !self.has_valid_parent(domain) {
            errors.push(format!(
                "Invalid sub domain reference {} set for power domain {name} within {context}",
                domain.sub_domain_of.as_deref().unwrap_or_default()
            ));
        }
        ParameterValidator::new(self.parser).find_errors_in_all(
            errors,
            &domain.parameters,
            &format!("power domain {name}"),
        );
    }

    fn validate(&self, domain: &PowerDomain) -> bool {
        has_valid_name(&domain.name)
            && self.has_valid_always_on(domain)
            && self.has_valid_parent(domain)
            && ParameterValidator::new(self.parser).validate_all(&domain.parameters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipx_model::LiteralExpressionParser;

    #[test]
    fn parent_must_exist_and_differ() {
        let parser = LiteralExpressionParser::new();
        let domains = vec![
            PowerDomain::new("top"),
            PowerDomain::new("core").sub_domain_of("top"),
            PowerDomain::new("loop").sub_domain_of("loop"),
            PowerDomain::new("orphan").sub_domain_of("missing"),
        ];
        let validator = PowerDomainValidator::new(&parser, &domains);
        assert!(validator.validate(&domains[0]));
        assert!(validator.validate(&domains[1]));
        assert!(!validator.validate(&domains[2]));

        let mut errors = Vec::new();
        validator.find_errors_in(&mut errors, &domains[3], "component c");
        assert_eq!(
            errors,
            vec!["Invalid sub domain reference missing set for power domain orphan within component c"]
        );
    }

    #[test]
    fn always_on_is_boolean() {
        let parser = LiteralExpressionParser::new();
        let on = PowerDomain {
            always_on: "1".to_string(),
            ..PowerDomain::new("aon")
        };
        let odd = PowerDomain {
            always_on: "2".to_string(),
            ..PowerDomain::new("odd")
        };
        let domains = [on.clone(), odd.clone()];
        let validator = PowerDomainValidator::new(&parser, &domains);
        assert!(validator.validate(&on));
        let mut errors = Vec::new();
        validator.find_errors_in(&mut errors, &odd, "component c");
        assert_eq!(
            errors,
            vec!["Invalid always on set for power domain odd within component c"]
        );
    }
}

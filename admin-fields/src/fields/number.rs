//! Integer and floating point fields

use minijinja::Value;

use super::base::{BaseField, RenderContext};
use super::error::{ConfigureError, RenderError, ValidationError};
use super::tag::TagMap;
use super::Field;
use crate::template::FieldTemplates;
use crate::value::FieldValue;

const NUMBER_TEMPLATE: &str = "fields/input.html";

fn bound_attr<T: ToString>(bound: Option<T>) -> Value {
    Value::from(bound.map(|b| b.to_string()).unwrap_or_default())
}

/// Whole number input
#[derive(Debug, Clone, Default)]
pub struct IntField {
    base: BaseField,
    min: Option<i64>,
    max: Option<i64>,
}

impl IntField {
    /// Create an integer field
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: BaseField::new(name),
            ..Self::default()
        }
    }

    /// Restrict accepted values to `min..=max`
    #[must_use]
    pub const fn range(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }
}

impl Field for IntField {
    fn attrs(&self) -> &BaseField {
        &self.base
    }

    fn attrs_mut(&mut self) -> &mut BaseField {
        &mut self.base
    }

    fn configure(&mut self, tags: &TagMap) -> Result<(), ConfigureError> {
        let min = tags.parse::<i64>("min")?.or(self.min);
        let max = tags.parse::<i64>("max")?.or(self.max);
        check_range(min, max)?;
        self.base.configure(tags)?;
        self.min = min;
        self.max = max;
        Ok(())
    }

    fn render(
        &self,
        templates: &FieldTemplates,
        value: &FieldValue,
        error: Option<&str>,
        start_row: bool,
    ) -> Result<String, RenderError> {
        let ctx = RenderContext::from([
            ("input_type", Value::from("number")),
            ("step", Value::from("1")),
            ("min", bound_attr(self.min)),
            ("max", bound_attr(self.max)),
        ]);
        self.base
            .base_render(templates, NUMBER_TEMPLATE, value, error, start_row, ctx)
    }

    fn validate(&self, raw: &str) -> Result<FieldValue, ValidationError> {
        let n = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| ValidationError::invalid("Enter a whole number."))?;
        check_bounds(n, self.min, self.max)?;
        Ok(FieldValue::Int(n))
    }
}

/// Decimal number input
#[derive(Debug, Clone, Default)]
pub struct FloatField {
    base: BaseField,
    min: Option<f64>,
    max: Option<f64>,
    step: Option<String>,
}

impl FloatField {
    /// Create a float field
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: BaseField::new(name),
            ..Self::default()
        }
    }

    /// Restrict accepted values to `min..=max`
    #[must_use]
    pub const fn range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }
}

impl Field for FloatField {
    fn attrs(&self) -> &BaseField {
        &self.base
    }

    fn attrs_mut(&mut self) -> &mut BaseField {
        &mut self.base
    }

    fn configure(&mut self, tags: &TagMap) -> Result<(), ConfigureError> {
        let min = tags.parse::<f64>("min")?.or(self.min);
        let max = tags.parse::<f64>("max")?.or(self.max);
        let step = tags.value("step");
        if let Some(step) = step {
            let valid = step == "any" || step.parse::<f64>().is_ok_and(|s| s > 0.0);
            if !valid {
                return Err(ConfigureError::invalid(
                    "step",
                    step,
                    "must be a positive number or \"any\"",
                ));
            }
        }
        check_range(min, max)?;
        self.base.configure(tags)?;
        self.min = min;
        self.max = max;
        if let Some(step) = step {
            self.step = Some(step.to_string());
        }
        Ok(())
    }

    fn render(
        &self,
        templates: &FieldTemplates,
        value: &FieldValue,
        error: Option<&str>,
        start_row: bool,
    ) -> Result<String, RenderError> {
        let ctx = RenderContext::from([
            ("input_type", Value::from("number")),
            ("step", Value::from(self.step.as_deref().unwrap_or("any"))),
            ("min", bound_attr(self.min)),
            ("max", bound_attr(self.max)),
        ]);
        self.base
            .base_render(templates, NUMBER_TEMPLATE, value, error, start_row, ctx)
    }

    fn validate(&self, raw: &str) -> Result<FieldValue, ValidationError> {
        let x = raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|x| x.is_finite())
            .ok_or_else(|| ValidationError::invalid("Enter a number."))?;
        check_bounds(x, self.min, self.max)?;
        Ok(FieldValue::Float(x))
    }
}

fn check_range<T: PartialOrd + std::fmt::Display>(
    min: Option<T>,
    max: Option<T>,
) -> Result<(), ConfigureError> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(ConfigureError::invalid(
            "min",
            &min.to_string(),
            format!("is greater than max {max}"),
        )),
        _ => Ok(()),
    }
}

fn check_bounds<T: PartialOrd + std::fmt::Display>(
    value: T,
    min: Option<T>,
    max: Option<T>,
) -> Result<(), ValidationError> {
    if let Some(min) = min {
        if value < min {
            return Err(ValidationError::invalid(format!(
                "Ensure this value is greater than or equal to {min}."
            )));
        }
    }
    if let Some(max) = max {
        if value > max {
            return Err(ValidationError::invalid(format!(
                "Ensure this value is less than or equal to {max}."
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::parse_tag;

    #[test]
    fn test_int_validate() {
        let field = IntField::new("qty");
        assert_eq!(field.validate(" 42 ").unwrap(), FieldValue::Int(42));
        assert_eq!(field.validate("-7").unwrap(), FieldValue::Int(-7));
        assert_eq!(
            field.validate("4.5").unwrap_err().to_string(),
            "Enter a whole number."
        );
        assert!(field.validate("abc").is_err());
    }

    #[test]
    fn test_int_bounds() {
        let mut field = IntField::new("rating");
        field.configure(&parse_tag("min=1,max=5")).unwrap();

        assert!(field.validate("1").is_ok());
        assert!(field.validate("5").is_ok());
        assert_eq!(
            field.validate("0").unwrap_err().to_string(),
            "Ensure this value is greater than or equal to 1."
        );
        assert_eq!(
            field.validate("6").unwrap_err().to_string(),
            "Ensure this value is less than or equal to 5."
        );
    }

    #[test]
    fn test_int_configure_rejects_inverted_range() {
        let mut field = IntField::new("x");
        assert!(field.configure(&parse_tag("min=10,max=1")).is_err());
        assert!(field.configure(&parse_tag("min=ten")).is_err());
    }

    #[test]
    fn test_failed_configure_leaves_field_unchanged() {
        let mut field = IntField::new("x");
        assert!(field.configure(&parse_tag("min=10,max=1,label=Count")).is_err());
        assert_eq!(field.validate("5").unwrap(), FieldValue::Int(5));
        assert_eq!(field.attrs().label, "X");

        let mut price = FloatField::new("price").range(Some(0.0), None);
        assert!(price.configure(&parse_tag("max=5,step=-1")).is_err());
        assert_eq!(price.validate("7.5").unwrap(), FieldValue::Float(7.5));
    }

    #[test]
    fn test_int_render_keeps_zero_min() {
        let templates = FieldTemplates::new().unwrap();
        let field = IntField::new("stock").range(Some(0), None);
        let html = field
            .render(&templates, &FieldValue::Int(3), None, false)
            .unwrap();

        assert!(html.contains(r#"type="number""#));
        assert!(html.contains(r#"step="1""#));
        assert!(html.contains(r#"min="0""#));
        assert!(!html.contains("max="));
        assert!(html.contains(r#"value="3""#));
    }

    #[test]
    fn test_float_validate() {
        let field = FloatField::new("price").range(Some(0.0), None);
        assert_eq!(field.validate("9.99").unwrap(), FieldValue::Float(9.99));
        assert!(field.validate("-0.5").is_err());
        assert!(field.validate("NaN").is_err());
        assert!(field.validate("inf").is_err());
        assert_eq!(
            field.validate("nine").unwrap_err().to_string(),
            "Enter a number."
        );
    }

    #[test]
    fn test_float_step() {
        let mut field = FloatField::new("weight");
        field.configure(&parse_tag("step=0.01")).unwrap();
        assert!(field.configure(&parse_tag("step=-1")).is_err());
        assert!(field.configure(&parse_tag("step=any")).is_ok());

        let templates = FieldTemplates::new().unwrap();
        let html = FloatField::new("weight")
            .render(&templates, &FieldValue::Null, None, false)
            .unwrap();
        assert!(html.contains(r#"step="any""#));
        assert!(html.contains(r#"value="""#));
    }
}

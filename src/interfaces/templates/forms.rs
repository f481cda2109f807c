use crate::{
    entities::form::{FormErrors, FormField, ModelForm, Widget},
    utils::markdown::escape,
};

/// An edit page for any `ModelForm`: heading, fields with their errors and a Save button.
///
/// `heading` and `template` are trusted constants and are not escaped.
/// `template` names the page (for example `cv/skill_edit.html`) and is
/// stamped on the wrapper so the new and edit views are recognisable as the same page.
pub fn edit_page<F: ModelForm>(template: &str, heading: &str, form: &F, errors: &FormErrors) -> String {
    let fields: String = F::FIELDS
        .iter()
        .zip(form.values())
        .map(|(field, value)| render_field(field, &value, errors))
        .collect();

    format!(
        r#"<div class="edit-page" data-template="{template}">
<h2>{heading}</h2>
<form method="POST" class="post-form">
{fields}<button type="submit" class="save btn btn-secondary">Save</button>
</form>
</div>"#,
    )
}

fn render_field(field: &FormField, value: &str, errors: &FormErrors) -> String {
    let id = field.html_id();
    let input = match field.widget {
        Widget::Text => format!(
            r#"<input type="text" name="{name}" id="{id}" class="form-control" placeholder="{placeholder}" value="{value}">"#,
            name = field.name,
            placeholder = escape(field.placeholder),
            value = escape(value),
        ),
        Widget::TextArea => format!(
            r#"<textarea name="{name}" id="{id}" class="form-control" rows="8" placeholder="{placeholder}">{value}</textarea>"#,
            name = field.name,
            placeholder = escape(field.placeholder),
            value = escape(value),
        ),
        Widget::Select(choices) => {
            let options: String = choices
                .iter()
                .map(|(choice, label)| {
                    let selected = if *choice == value { " selected" } else { "" };
                    format!(r#"<option value="{choice}"{selected}>{label}</option>"#)
                })
                .collect();
            format!(
                r#"<select name="{name}" id="{id}" class="form-control"><option value="">---------</option>{options}</select>"#,
                name = field.name,
            )
        }
    };

    let messages: String = errors
        .for_field(field.name)
        .map(|message| format!("<li>{}</li>", escape(message)))
        .collect();
    let error_list = if messages.is_empty() {
        String::new()
    } else {
        format!(r#"<ul class="errorlist">{messages}</ul>"#)
    };

    format!(
        r#"<div class="form-group">
<label for="{id}">{label}:</label>
{input}
{error_list}
</div>
"#,
        label = escape(field.label),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::skill::SkillForm;
    use crate::errors::FieldError;

    #[test]
    fn fields_render_with_ids_and_values() {
        let form = SkillForm { title: "Rust".into(), skill_type: "other".into() };
        let html = edit_page("cv/skill_edit.html", "New Skill", &form, &FormErrors::default());

        assert!(html.contains(r#"data-template="cv/skill_edit.html""#));
        assert!(html.contains("<h2>New Skill</h2>"));
        assert!(html.contains(r#"id="id_title""#));
        assert!(html.contains(r#"value="Rust""#));
        assert!(html.contains(r#"<option value="other" selected>Other</option>"#));
        assert!(html.contains(r#"class="save btn btn-secondary""#));
        assert!(!html.contains("errorlist"));
    }

    #[test]
    fn errors_are_listed_under_their_field() {
        let errors = FormErrors::new(vec![FieldError {
            field: "skill_type".into(),
            message: "This field is required.".into(),
        }]);
        let html = edit_page("cv/skill_edit.html", "New Skill", &SkillForm::default(), &errors);

        let select = html.find(r#"id="id_skill_type""#).unwrap();
        let list = html.find(r#"<ul class="errorlist">"#).unwrap();
        assert!(list > select);
    }

    #[test]
    fn values_are_escaped() {
        let form = SkillForm { title: "\"><script>".into(), skill_type: String::new() };
        let html = edit_page("t", "h", &form, &FormErrors::default());
        assert!(!html.contains("<script>"));
    }
}

use crate::{
    entities::{
        cv::CvKind,
        education::Education,
        experience::Experience,
        interest::Interest,
        skill::Skill,
    },
    interfaces::templates::layout::Page,
    use_cases::cv::CvOverview,
    utils::markdown::{escape, linebreaks},
};

pub fn cv_page(page: &Page, cv: &CvOverview) -> String {
    page.render(&format!(
        r#"<div class="cv">
<h1 style="text-align: center;">{owner}</h1>
<section id="statement-section">
<h2>Statement</h2>
<p class="statement">{statement}</p>
</section>
<section id="skills-section">
<h2>Skills</h2>
{new_skill}
<div class="row">
<div class="col-md-6" id="tech-skill-table">
<h3>Technical Skills</h3>
{technical}
</div>
<div class="col-md-6" id="other-skill-table">
<h3>Other Skills</h3>
{other}
</div>
</div>
</section>
<section id="education-section">
<h2>Education</h2>
{new_education}
{education}
</section>
<section id="experience-section">
<h2>Experience</h2>
{new_experience}
{experience}
</section>
<section>
<h2>Interests</h2>
{new_interest}
<table class="table" id="interest-table">
<tbody>
{interests}</tbody>
</table>
</section>
</div>"#,
        owner = escape(&page.site.owner_name),
        statement = linebreaks(&page.site.statement),
        new_skill = new_button(page, CvKind::Skill),
        technical = skill_table(page, &cv.technical_skills),
        other = skill_table(page, &cv.other_skills),
        new_education = new_button(page, CvKind::Education),
        education = cv.education.iter().map(|e| education_card(page, e)).collect::<String>(),
        new_experience = new_button(page, CvKind::Experience),
        experience = cv.experience.iter().map(|e| experience_card(page, e)).collect::<String>(),
        new_interest = new_button(page, CvKind::Interest),
        interests = cv.interests.iter().map(|i| interest_row(page, i)).collect::<String>(),
    ))
}

fn new_button(page: &Page, kind: CvKind) -> String {
    if !page.is_authenticated() {
        return String::new();
    }
    format!(
        r#"<a class="btn btn-outline-dark btn-sm" id="new-{slug}" href="/cv/{slug}/new/">New {heading}</a>"#,
        slug = kind.slug(),
        heading = kind.heading(),
    )
}

fn entry_buttons(page: &Page, kind: CvKind, id: i64) -> String {
    if !page.is_authenticated() {
        return String::new();
    }
    format!(
        r#"<span class="entry-buttons"><a class="btn btn-sm btn-secondary edit_btn" href="/cv/{slug}/{id}/edit/">Edit</a> <a class="btn btn-sm btn-danger delete_btn" href="/cv/{slug}/{id}/remove/">Delete</a></span>"#,
        slug = kind.slug(),
    )
}

fn skill_table(page: &Page, skills: &[Skill]) -> String {
    let rows: String = skills
        .iter()
        .map(|skill| {
            format!(
                r#"<tr class="skill"><td class="skill-title">{title}</td><td>{buttons}</td></tr>
"#,
                title = escape(&skill.title),
                buttons = entry_buttons(page, CvKind::Skill, skill.id),
            )
        })
        .collect();

    format!(
        r#"<table class="table">
<tbody>
{rows}</tbody>
</table>"#
    )
}

fn education_card(page: &Page, education: &Education) -> String {
    format!(
        r##"<div class="card education">
<div class="card-header collapsed" data-toggle="collapse" data-target="#education-{id}">
<h4 class="title">{title}</h4>
<p class="location">{location} | {start} - {end}</p>
<p class="brief">{brief}</p>
</div>
<div id="education-{id}" class="collapse">
<div class="card-body">
<p class="detailed">{detailed}</p>
{buttons}
</div>
</div>
</div>
"##,
        id = education.id,
        title = escape(&education.title),
        location = escape(&education.location),
        start = escape(&education.start_date),
        end = escape(&education.end_date),
        brief = escape(&education.brief_text),
        detailed = linebreaks(&education.detailed_text),
        buttons = entry_buttons(page, CvKind::Education, education.id),
    )
}

fn experience_card(page: &Page, experience: &Experience) -> String {
    format!(
        r##"<div class="card experience">
<div class="card-header collapsed" data-toggle="collapse" data-target="#experience-{id}">
<h4 class="title">{title}</h4>
<p class="subtitle">{subtitle}</p>
<p class="date">{date}</p>
</div>
<div id="experience-{id}" class="collapse">
<div class="card-body">
<p class="text">{text}</p>
{buttons}
</div>
</div>
</div>
"##,
        id = experience.id,
        title = escape(&experience.title),
        subtitle = escape(&experience.subtitle),
        date = escape(&experience.date),
        text = linebreaks(&experience.text),
        buttons = entry_buttons(page, CvKind::Experience, experience.id),
    )
}

fn interest_row(page: &Page, interest: &Interest) -> String {
    format!(
        r#"<tr class="interest"><td class="interest-title">{title}</td><td>{buttons}</td></tr>
"#,
        title = escape(&interest.title),
        buttons = entry_buttons(page, CvKind::Interest, interest.id),
    )
}

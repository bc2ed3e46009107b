use serde::{Deserialize, Serialize};

pub const API_PREFIX: &str = "/api/v1";

/// Hypermedia link attached to every resource returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    pub rel: String,
    pub method: String,
}

impl Link {
    pub fn new(href: impl Into<String>, rel: &str, method: &str) -> Self {
        Self {
            href: href.into(),
            rel: rel.to_string(),
            method: method.to_string(),
        }
    }
}

fn crud_links(collection: &str, id: &str) -> Vec<Link> {
    let href = format!("{}/{}/{}", API_PREFIX, collection, id);
    vec![
        Link::new(href.clone(), "self", "GET"),
        Link::new(href.clone(), "update", "PUT"),
        Link::new(href, "delete", "DELETE"),
    ]
}

pub fn user_links(id: i64) -> Vec<Link> {
    let mut links = crud_links("users", &id.to_string());
    links.push(Link::new(
        format!("{}/users/{}/course-recommendations", API_PREFIX, id),
        "recommendations",
        "GET",
    ));
    links
}

pub fn company_links(id: i64) -> Vec<Link> {
    let mut links = crud_links("companies", &id.to_string());
    links.push(Link::new(
        format!("{}/job-postings?companyId={}", API_PREFIX, id),
        "job-postings",
        "GET",
    ));
    links
}

pub fn job_posting_links(id: i64, company_id: i64) -> Vec<Link> {
    let mut links = crud_links("job-postings", &id.to_string());
    links.push(Link::new(
        format!("{}/companies/{}", API_PREFIX, company_id),
        "company",
        "GET",
    ));
    links
}

pub fn course_links(id: i64) -> Vec<Link> {
    crud_links("courses", &id.to_string())
}

pub fn certificate_links(id: &str, user_id: i64, course_id: i64) -> Vec<Link> {
    let mut links = crud_links("certificates", id);
    links.push(Link::new(
        format!("{}/users/{}", API_PREFIX, user_id),
        "user",
        "GET",
    ));
    links.push(Link::new(
        format!("{}/courses/{}", API_PREFIX, course_id),
        "course",
        "GET",
    ));
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_links_point_at_recommendations() {
        let links = user_links(7);
        assert_eq!(links[0], Link::new("/api/v1/users/7", "self", "GET"));
        assert_eq!(links[2].method, "DELETE");
        assert_eq!(links[3].href, "/api/v1/users/7/course-recommendations");
    }

    #[test]
    fn company_links_filter_job_postings_by_company() {
        let links = company_links(3);
        assert!(links
            .iter()
            .any(|l| l.rel == "job-postings" && l.href == "/api/v1/job-postings?companyId=3"));
    }

    #[test]
    fn certificate_links_reference_owner_and_course() {
        let links = certificate_links("1234567890", 1, 2);
        let rels: Vec<&str> = links.iter().map(|l| l.rel.as_str()).collect();
        assert_eq!(rels, ["self", "update", "delete", "user", "course"]);
        assert_eq!(links[3].href, "/api/v1/users/1");
        assert_eq!(links[4].href, "/api/v1/courses/2");
    }
}

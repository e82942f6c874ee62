//! Static registry of course weeks.
//!
//! Each week pairs its rubric with the dependencies the assignment
//! introduces and the routes the endpoint check should look for. The
//! registry decides which check producers run for a given week.

use crate::checks::{
    AppImportCheck, AuthCheck, CheckProducer, DatabaseCheck, DockerCheck, EndpointsCheck,
    ReadmeCheck, RequirementsCheck, StructureCheck, TestingCheck,
};

#[derive(Debug, Clone, Copy)]
pub struct WeekSuite {
    pub number: u32,
    pub title: &'static str,
    /// Packages the week's assignment requires to be declared.
    pub dependencies: &'static [&'static str],
    /// Routes the assignment asks the student to implement.
    pub endpoints: &'static [&'static str],
}

pub static WEEKS: &[WeekSuite] = &[
    WeekSuite {
        number: 1,
        title: "Hello World API",
        dependencies: &["fastapi", "uvicorn"],
        endpoints: &["/", "/hello/{name}"],
    },
    WeekSuite {
        number: 2,
        title: "Request & Response Models",
        dependencies: &["fastapi", "uvicorn", "pydantic"],
        endpoints: &["/", "/items", "/items/{item_id}"],
    },
    WeekSuite {
        number: 3,
        title: "Forms, Files & Error Handling",
        dependencies: &["fastapi", "uvicorn", "python-multipart"],
        endpoints: &["/", "/upload", "/form"],
    },
    WeekSuite {
        number: 4,
        title: "Databases with SQLAlchemy",
        dependencies: &["fastapi", "uvicorn", "sqlalchemy"],
        endpoints: &["/", "/items", "/items/{item_id}"],
    },
    WeekSuite {
        number: 5,
        title: "Migrations & Relationships",
        dependencies: &["fastapi", "uvicorn", "sqlalchemy", "alembic"],
        endpoints: &["/", "/items", "/items/{item_id}"],
    },
    WeekSuite {
        number: 6,
        title: "Authentication & JWT",
        dependencies: &["fastapi", "uvicorn", "python-jose", "passlib"],
        endpoints: &["/", "/token", "/users/me"],
    },
    WeekSuite {
        number: 7,
        title: "Testing with Pytest",
        dependencies: &["fastapi", "uvicorn", "pytest", "httpx"],
        endpoints: &["/", "/items"],
    },
    WeekSuite {
        number: 8,
        title: "Containerization & Deployment",
        dependencies: &["fastapi", "uvicorn"],
        endpoints: &["/"],
    },
    WeekSuite {
        number: 9,
        title: "Background Tasks & Async",
        dependencies: &["fastapi", "uvicorn"],
        endpoints: &["/", "/tasks"],
    },
    WeekSuite {
        number: 10,
        title: "WebSockets & Realtime",
        dependencies: &["fastapi", "uvicorn", "websockets"],
        endpoints: &["/", "/ws"],
    },
    WeekSuite {
        number: 11,
        title: "Final Project",
        dependencies: &["fastapi", "uvicorn", "sqlalchemy", "pytest"],
        endpoints: &["/"],
    },
];

pub fn suite_for(week: u32) -> Option<&'static WeekSuite> {
    WEEKS.iter().find(|suite| suite.number == week)
}

impl WeekSuite {
    /// Check producers that apply to this week, in the order their
    /// results appear in the evaluation report.
    pub fn producers(&self) -> Vec<Box<dyn CheckProducer>> {
        let mut producers: Vec<Box<dyn CheckProducer>> = vec![
            Box::new(StructureCheck),
            Box::new(RequirementsCheck {
                dependencies: self.dependencies,
            }),
            Box::new(AppImportCheck::default()),
            Box::new(ReadmeCheck),
            Box::new(EndpointsCheck {
                expected: self.endpoints,
            }),
        ];
        if self.number >= 4 {
            producers.push(Box::new(DatabaseCheck));
        }
        if self.number >= 6 {
            producers.push(Box::new(AuthCheck));
        }
        if self.number >= 7 {
            producers.push(Box::new(TestingCheck));
        }
        if self.number >= 8 {
            producers.push(Box::new(DockerCheck));
        }
        producers
    }
}

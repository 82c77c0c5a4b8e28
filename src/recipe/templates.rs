//! Build recipe templates
//!
//! One generator function per project type. Every recipe is a self-contained
//! Dockerfile parameterized only by the listening port; dependency install,
//! build and the minimal runtime image are baked into the template.

/// Shared nginx server block for single-page-app and static recipes
fn nginx_spa_config(port: u16) -> String {
    format!(
        "RUN echo 'server {{ \\\n\
         \x20   listen {port}; \\\n\
         \x20   location / {{ \\\n\
         \x20       root /usr/share/nginx/html; \\\n\
         \x20       index index.html index.htm; \\\n\
         \x20       try_files $uri $uri/ /index.html; \\\n\
         \x20   }} \\\n\
         }}' > /etc/nginx/conf.d/default.conf\n"
    )
}

fn nginx_static_config(port: u16) -> String {
    format!(
        "RUN echo 'server {{ \\\n\
         \x20   listen {port}; \\\n\
         \x20   location / {{ \\\n\
         \x20       root /usr/share/nginx/html; \\\n\
         \x20       index index.html; \\\n\
         \x20   }} \\\n\
         }}' > /etc/nginx/conf.d/default.conf\n"
    )
}

pub fn nextjs(port: u16) -> String {
    format!(
        "# Next.js optimized build\n\
         FROM node:18-alpine AS base\n\
         \n\
         FROM base AS deps\n\
         RUN apk add --no-cache libc6-compat\n\
         WORKDIR /app\n\
         \n\
         COPY package*.json ./\n\
         RUN npm ci\n\
         \n\
         FROM base AS builder\n\
         WORKDIR /app\n\
         COPY --from=deps /app/node_modules ./node_modules\n\
         COPY . .\n\
         \n\
         ENV NEXT_TELEMETRY_DISABLED 1\n\
         RUN npm run build\n\
         \n\
         FROM base AS runner\n\
         WORKDIR /app\n\
         \n\
         ENV NODE_ENV production\n\
         ENV NEXT_TELEMETRY_DISABLED 1\n\
         \n\
         RUN addgroup --system --gid 1001 nodejs\n\
         RUN adduser --system --uid 1001 nextjs\n\
         \n\
         COPY --from=builder /app/public ./public\n\
         COPY --from=builder --chown=nextjs:nodejs /app/.next/standalone ./\n\
         COPY --from=builder --chown=nextjs:nodejs /app/.next/static ./.next/static\n\
         \n\
         USER nextjs\n\
         \n\
         EXPOSE {port}\n\
         ENV PORT {port}\n\
         \n\
         CMD [\"node\", \"server.js\"]\n"
    )
}

pub fn react(port: u16) -> String {
    format!(
        "# React build with nginx runtime\n\
         FROM node:18-alpine AS build\n\
         WORKDIR /app\n\
         \n\
         COPY package*.json ./\n\
         RUN npm ci\n\
         \n\
         COPY . .\n\
         RUN npm run build\n\
         \n\
         FROM nginx:alpine\n\
         COPY --from=build /app/build /usr/share/nginx/html\n\
         \n\
         {nginx}\
         \n\
         EXPOSE {port}\n\
         CMD [\"nginx\", \"-g\", \"daemon off;\"]\n",
        nginx = nginx_spa_config(port),
    )
}

pub fn vue(port: u16) -> String {
    format!(
        "# Vue.js build with nginx runtime\n\
         FROM node:18-alpine AS build\n\
         WORKDIR /app\n\
         \n\
         COPY package*.json ./\n\
         RUN npm ci\n\
         \n\
         COPY . .\n\
         RUN npm run build\n\
         \n\
         FROM nginx:alpine\n\
         COPY --from=build /app/dist /usr/share/nginx/html\n\
         \n\
         {nginx}\
         \n\
         EXPOSE {port}\n\
         CMD [\"nginx\", \"-g\", \"daemon off;\"]\n",
        nginx = nginx_spa_config(port),
    )
}

pub fn angular(port: u16) -> String {
    format!(
        "# Angular build with nginx runtime\n\
         FROM node:18-alpine AS build\n\
         WORKDIR /app\n\
         \n\
         COPY package*.json ./\n\
         RUN npm ci\n\
         \n\
         COPY . .\n\
         RUN npm run build -- --configuration production\n\
         \n\
         FROM nginx:alpine\n\
         COPY --from=build /app/dist /usr/share/nginx/html\n\
         \n\
         {nginx}\
         \n\
         EXPOSE {port}\n\
         CMD [\"nginx\", \"-g\", \"daemon off;\"]\n",
        nginx = nginx_spa_config(port),
    )
}

pub fn svelte(port: u16) -> String {
    format!(
        "# Svelte build with nginx runtime\n\
         FROM node:18-alpine AS build\n\
         WORKDIR /app\n\
         \n\
         COPY package*.json ./\n\
         RUN npm ci\n\
         \n\
         COPY . .\n\
         RUN npm run build\n\
         \n\
         FROM nginx:alpine\n\
         COPY --from=build /app/public /usr/share/nginx/html\n\
         \n\
         {nginx}\
         \n\
         EXPOSE {port}\n\
         CMD [\"nginx\", \"-g\", \"daemon off;\"]\n",
        nginx = nginx_spa_config(port),
    )
}

pub fn nuxt(port: u16) -> String {
    format!(
        "# Nuxt.js runtime\n\
         FROM node:18-alpine\n\
         WORKDIR /app\n\
         \n\
         COPY package*.json ./\n\
         RUN npm ci\n\
         \n\
         COPY . .\n\
         RUN npm run build\n\
         \n\
         ENV NODE_ENV production\n\
         \n\
         EXPOSE {port}\n\
         ENV PORT {port}\n\
         \n\
         CMD [\"npm\", \"run\", \"start\"]\n"
    )
}

pub fn spring_boot(port: u16) -> String {
    format!(
        "# Spring Boot multi-stage build\n\
         FROM maven:3.9-eclipse-temurin-17 AS build\n\
         WORKDIR /app\n\
         \n\
         COPY pom.xml .\n\
         RUN mvn dependency:go-offline\n\
         \n\
         COPY src ./src\n\
         RUN mvn clean package -DskipTests\n\
         \n\
         FROM eclipse-temurin:17-jre-alpine\n\
         WORKDIR /app\n\
         \n\
         COPY --from=build /app/target/*.jar app.jar\n\
         \n\
         EXPOSE {port}\n\
         \n\
         ENTRYPOINT [\"java\", \"-jar\", \"-Dserver.port={port}\", \"app.jar\"]\n"
    )
}

pub fn micronaut(port: u16) -> String {
    format!(
        "# Micronaut multi-stage build\n\
         FROM gradle:8-jdk17 AS build\n\
         WORKDIR /app\n\
         \n\
         COPY build.gradle settings.gradle ./\n\
         COPY gradle ./gradle\n\
         RUN gradle dependencies\n\
         \n\
         COPY src ./src\n\
         RUN gradle build -x test\n\
         \n\
         FROM eclipse-temurin:17-jre-alpine\n\
         WORKDIR /app\n\
         \n\
         COPY --from=build /app/build/libs/*-all.jar app.jar\n\
         \n\
         EXPOSE {port}\n\
         \n\
         ENTRYPOINT [\"java\", \"-jar\", \"app.jar\"]\n"
    )
}

pub fn quarkus(port: u16) -> String {
    format!(
        "# Quarkus native multi-stage build\n\
         FROM maven:3.9-eclipse-temurin-17 AS build\n\
         WORKDIR /app\n\
         \n\
         COPY pom.xml .\n\
         RUN mvn dependency:go-offline\n\
         \n\
         COPY src ./src\n\
         RUN mvn package -Pnative -DskipTests\n\
         \n\
         FROM registry.access.redhat.com/ubi8/ubi-minimal\n\
         WORKDIR /app\n\
         \n\
         COPY --from=build /app/target/*-runner /app/application\n\
         \n\
         EXPOSE {port}\n\
         \n\
         CMD [\"./application\"]\n"
    )
}

pub fn django(port: u16) -> String {
    format!(
        "# Django runtime\n\
         FROM python:3.11-slim\n\
         WORKDIR /app\n\
         \n\
         ENV PYTHONUNBUFFERED=1\n\
         ENV PYTHONDONTWRITEBYTECODE=1\n\
         \n\
         COPY requirements.txt .\n\
         RUN pip install --no-cache-dir -r requirements.txt\n\
         \n\
         COPY . .\n\
         \n\
         RUN python manage.py collectstatic --noinput || true\n\
         RUN python manage.py migrate || true\n\
         \n\
         EXPOSE {port}\n\
         \n\
         CMD [\"gunicorn\", \"--bind\", \"0.0.0.0:{port}\", \"wsgi:application\"]\n"
    )
}

pub fn flask(port: u16) -> String {
    format!(
        "# Flask runtime\n\
         FROM python:3.11-slim\n\
         WORKDIR /app\n\
         \n\
         ENV PYTHONUNBUFFERED=1\n\
         \n\
         COPY requirements.txt .\n\
         RUN pip install --no-cache-dir -r requirements.txt\n\
         \n\
         COPY . .\n\
         \n\
         EXPOSE {port}\n\
         ENV FLASK_APP=app.py\n\
         \n\
         CMD [\"gunicorn\", \"--bind\", \"0.0.0.0:{port}\", \"--workers\", \"4\", \"app:app\"]\n"
    )
}

pub fn fastapi(port: u16) -> String {
    format!(
        "# FastAPI runtime\n\
         FROM python:3.11-slim\n\
         WORKDIR /app\n\
         \n\
         ENV PYTHONUNBUFFERED=1\n\
         \n\
         COPY requirements.txt .\n\
         RUN pip install --no-cache-dir -r requirements.txt\n\
         \n\
         COPY . .\n\
         \n\
         EXPOSE {port}\n\
         \n\
         CMD [\"uvicorn\", \"main:app\", \"--host\", \"0.0.0.0\", \"--port\", \"{port}\"]\n"
    )
}

pub fn node_backend(port: u16) -> String {
    format!(
        "# Node.js backend runtime\n\
         FROM node:18-alpine\n\
         WORKDIR /app\n\
         \n\
         COPY package*.json ./\n\
         RUN npm ci --only=production\n\
         \n\
         COPY . .\n\
         \n\
         ENV NODE_ENV=production\n\
         ENV PORT={port}\n\
         \n\
         EXPOSE {port}\n\
         \n\
         CMD [\"npm\", \"start\"]\n"
    )
}

pub fn golang(port: u16) -> String {
    format!(
        "# Go multi-stage build\n\
         FROM golang:1.21-alpine AS build\n\
         WORKDIR /app\n\
         \n\
         COPY go.mod go.sum ./\n\
         RUN go mod download\n\
         \n\
         COPY . .\n\
         RUN CGO_ENABLED=0 GOOS=linux go build -o main .\n\
         \n\
         FROM alpine:latest\n\
         WORKDIR /app\n\
         \n\
         RUN apk --no-cache add ca-certificates\n\
         \n\
         COPY --from=build /app/main .\n\
         \n\
         EXPOSE {port}\n\
         ENV PORT={port}\n\
         \n\
         CMD [\"./main\"]\n"
    )
}

pub fn rails(port: u16) -> String {
    format!(
        "# Ruby on Rails runtime\n\
         FROM ruby:3.2-alpine\n\
         WORKDIR /app\n\
         \n\
         RUN apk add --no-cache build-base postgresql-dev nodejs yarn\n\
         \n\
         COPY Gemfile Gemfile.lock ./\n\
         RUN bundle install\n\
         \n\
         COPY . .\n\
         \n\
         RUN rails assets:precompile || true\n\
         \n\
         EXPOSE {port}\n\
         \n\
         CMD [\"rails\", \"server\", \"-b\", \"0.0.0.0\", \"-p\", \"{port}\"]\n"
    )
}

pub fn laravel(port: u16) -> String {
    format!(
        "# Laravel runtime\n\
         FROM php:8.2-fpm-alpine\n\
         WORKDIR /app\n\
         \n\
         RUN apk add --no-cache nginx composer\n\
         \n\
         COPY composer.json composer.lock ./\n\
         RUN composer install --no-scripts --no-autoloader\n\
         \n\
         COPY . .\n\
         RUN composer dump-autoload --optimize\n\
         \n\
         EXPOSE {port}\n\
         \n\
         CMD [\"php-fpm\"]\n"
    )
}

pub fn static_html(port: u16) -> String {
    format!(
        "# Static site with nginx\n\
         FROM nginx:alpine\n\
         \n\
         COPY . /usr/share/nginx/html\n\
         \n\
         {nginx}\
         \n\
         EXPOSE {port}\n\
         \n\
         CMD [\"nginx\", \"-g\", \"daemon off;\"]\n",
        nginx = nginx_static_config(port),
    )
}

pub fn gatsby(port: u16) -> String {
    format!(
        "# Gatsby build with nginx runtime\n\
         FROM node:18-alpine AS build\n\
         WORKDIR /app\n\
         \n\
         COPY package*.json ./\n\
         RUN npm ci\n\
         \n\
         COPY . .\n\
         RUN npm run build\n\
         \n\
         FROM nginx:alpine\n\
         COPY --from=build /app/public /usr/share/nginx/html\n\
         \n\
         {nginx}\
         \n\
         EXPOSE {port}\n\
         CMD [\"nginx\", \"-g\", \"daemon off;\"]\n",
        nginx = nginx_spa_config(port),
    )
}

pub fn hugo(port: u16) -> String {
    format!(
        "# Hugo build with nginx runtime\n\
         FROM alpine:latest AS build\n\
         WORKDIR /app\n\
         \n\
         RUN apk add --no-cache hugo\n\
         \n\
         COPY . .\n\
         RUN hugo\n\
         \n\
         FROM nginx:alpine\n\
         COPY --from=build /app/public /usr/share/nginx/html\n\
         \n\
         {nginx}\
         \n\
         EXPOSE {port}\n\
         CMD [\"nginx\", \"-g\", \"daemon off;\"]\n",
        nginx = nginx_static_config(port),
    )
}

pub fn jekyll(port: u16) -> String {
    format!(
        "# Jekyll build with nginx runtime\n\
         FROM ruby:3.2-alpine AS build\n\
         WORKDIR /app\n\
         \n\
         RUN apk add --no-cache build-base\n\
         RUN gem install jekyll bundler\n\
         \n\
         COPY Gemfile* ./\n\
         RUN bundle install\n\
         \n\
         COPY . .\n\
         RUN jekyll build\n\
         \n\
         FROM nginx:alpine\n\
         COPY --from=build /app/_site /usr/share/nginx/html\n\
         \n\
         {nginx}\
         \n\
         EXPOSE {port}\n\
         CMD [\"nginx\", \"-g\", \"daemon off;\"]\n",
        nginx = nginx_static_config(port),
    )
}

pub fn generic(port: u16) -> String {
    format!(
        "# Generic fallback\n\
         FROM alpine:latest\n\
         WORKDIR /app\n\
         \n\
         COPY . .\n\
         \n\
         EXPOSE {port}\n\
         \n\
         CMD [\"sh\", \"-c\", \"echo 'Application started on port {port}'\"]\n"
    )
}
